//! Storage Adapter - 上传文件临时存储

mod temp_upload;

pub use temp_upload::{TempUpload, TempUploadDir};
