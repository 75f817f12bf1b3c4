pub mod file;
pub mod wavelength;

use std::sync::Arc;

pub use file::{CandidateFile, FileSource, StagedFile};
pub use wavelength::WavelengthProfile;

/// 提取服务返回的原始结果（xlsx 字节）
pub type Payload = Arc<[u8]>;
