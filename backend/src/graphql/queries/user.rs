use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// Current authenticated user. Null when not authenticated.
    async fn me(&self, ctx: &Context<'_>) -> Option<User> {
        ctx.try_current_user().cloned().map(User::from)
    }
}
