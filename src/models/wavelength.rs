use crate::error::ConfigError;
use phf::phf_map;
use std::fmt;
use std::str::FromStr;

/// 波长组合枚举
///
/// 描述报告中包含哪些测量通道，顺序即界面上的展示顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WavelengthProfile {
    /// 1310nm & 1550nm
    #[default]
    Nm1310And1550,
    /// 1550nm & 1625nm
    Nm1550And1625,
    /// 1310nm & 1625nm
    Nm1310And1625,
    /// 1310nm, 1550nm & 1625nm
    Nm1310And1550And1625,
}

static PROFILES_BY_LABEL: phf::Map<&'static str, WavelengthProfile> = phf_map! {
    "1310nm & 1550nm" => WavelengthProfile::Nm1310And1550,
    "1550nm & 1625nm" => WavelengthProfile::Nm1550And1625,
    "1310nm & 1625nm" => WavelengthProfile::Nm1310And1625,
    "1310nm, 1550nm & 1625nm" => WavelengthProfile::Nm1310And1550And1625,
};

impl WavelengthProfile {
    /// 全部波长组合（按展示顺序）
    pub const ALL: [WavelengthProfile; 4] = [
        WavelengthProfile::Nm1310And1550,
        WavelengthProfile::Nm1550And1625,
        WavelengthProfile::Nm1310And1625,
        WavelengthProfile::Nm1310And1550And1625,
    ];

    /// 获取提交给服务的标签
    pub fn label(self) -> &'static str {
        match self {
            WavelengthProfile::Nm1310And1550 => "1310nm & 1550nm",
            WavelengthProfile::Nm1550And1625 => "1550nm & 1625nm",
            WavelengthProfile::Nm1310And1625 => "1310nm & 1625nm",
            WavelengthProfile::Nm1310And1550And1625 => "1310nm, 1550nm & 1625nm",
        }
    }

    /// 获取包含的波长（nm）
    pub fn values(self) -> &'static [u16] {
        match self {
            WavelengthProfile::Nm1310And1550 => &[1310, 1550],
            WavelengthProfile::Nm1550And1625 => &[1550, 1625],
            WavelengthProfile::Nm1310And1625 => &[1310, 1625],
            WavelengthProfile::Nm1310And1550And1625 => &[1310, 1550, 1625],
        }
    }

    /// 从标签解析波长组合
    pub fn from_label(label: &str) -> Option<Self> {
        PROFILES_BY_LABEL.get(label).copied()
    }
}

impl fmt::Display for WavelengthProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WavelengthProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s.trim()).ok_or_else(|| ConfigError::UnknownWavelength {
            label: s.to_string(),
        })
    }
}

impl TryFrom<String> for WavelengthProfile {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WavelengthProfile> for String {
    fn from(profile: WavelengthProfile) -> Self {
        profile.label().to_string()
    }
}
