//! User Registry Port - 用户登记

use async_trait::async_trait;

use crate::application::CollaboratorError;
use crate::domain::UserContact;

#[async_trait]
pub trait UserRegistryPort: Send + Sync {
    /// 插入用户记录，返回协作方的确认信息
    async fn insert_user(&self, contact: UserContact) -> Result<String, CollaboratorError>;
}
