use crate::models::WavelengthProfile;
use tracing::debug;

/// 波长选择
///
/// 始终持有一个有效的波长组合，默认第一个
#[derive(Debug, Clone, Copy, Default)]
pub struct WavelengthSelector {
    selected: WavelengthProfile,
}

impl WavelengthSelector {
    pub fn new(initial: WavelengthProfile) -> Self {
        Self { selected: initial }
    }

    pub fn select(&mut self, profile: WavelengthProfile) {
        debug!("选择波长组合: {}", profile);
        self.selected = profile;
    }

    pub fn selected(&self) -> WavelengthProfile {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_first_profile() {
        assert_eq!(
            WavelengthSelector::default().selected(),
            WavelengthProfile::Nm1310And1550
        );
    }

    #[test]
    fn test_select_changes_selection() {
        let mut selector = WavelengthSelector::default();
        selector.select(WavelengthProfile::Nm1310And1550And1625);
        assert_eq!(selector.selected().label(), "1310nm, 1550nm & 1625nm");
    }
}
