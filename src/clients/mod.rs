pub mod extraction_client;

pub use extraction_client::{
    ExtractionService, HttpExtractionClient, ProcessRequest, UploadPart,
};
