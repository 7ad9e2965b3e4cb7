//! SSH key endpoints
//!
//! Key listing is per user id; creation and deletion act on the keys of
//! the currently authenticated user.

use crate::client::SsoClient;
use crate::error::RequestResult;
use crate::result::ApiResponse;

impl SsoClient {
    /// List the SSH keys registered for a user.
    pub async fn ssh_keys_by_user_id(&self, user_id: u64) -> RequestResult<ApiResponse> {
        self.get(&format!("users/{user_id}/keys/json"), &[]).await
    }

    /// Register an SSH public key for the currently authenticated user.
    pub async fn create_ssh_key(
        &self,
        public_key: &str,
        name: Option<&str>,
    ) -> RequestResult<ApiResponse> {
        let mut parameters = vec![("public_key", public_key)];
        if let Some(name) = name {
            parameters.push(("name", name));
        }
        self.post("ssh-keys", &parameters).await
    }

    /// Delete one of the currently authenticated user's SSH keys.
    pub async fn delete_ssh_key(&self, key_id: u64) -> RequestResult<ApiResponse> {
        self.delete(&format!("ssh-keys/{key_id}"), &[]).await
    }
}
