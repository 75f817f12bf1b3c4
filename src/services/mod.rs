pub mod artifact_handler;
pub mod file_intake;
pub mod wavelength_selector;

pub use artifact_handler::{ArtifactHandler, DownloadHandle, ARTIFACT_FILE_NAME};
pub use file_intake::{FileIntake, IntakeReport, MAX_FILE_SIZE};
pub use wavelength_selector::WavelengthSelector;
