pub mod errors;
pub mod ratelimit;
pub mod api_ratelimit;

pub use errors::user_facing_error;
pub use ratelimit::CommandLimiter;

/// Check if a user has one of the required roles in a guild (case-insensitive)
/// The guild owner and anyone with an "Admin" role always pass
pub async fn check_user_roles(
    ctx: &serenity::prelude::Context,
    guild_id: serenity::model::prelude::GuildId,
    user_id: serenity::model::prelude::UserId,
    required_roles: &[&str],
) -> Result<(), String> {
    use tracing::debug;

    let member = match guild_id.member(&ctx.http, user_id).await {
        Ok(m) => m,
        Err(e) => {
            debug!("User {} is not a member of guild {}: {}", user_id, guild_id, e);
            return Err("User is not a member of this guild".to_string());
        }
    };

    let mut user_roles = Vec::new();

    // Try to get guild roles from cache first
    {
        if let Some(guild) = guild_id.to_guild_cached(&ctx.cache) {
            for rid in &member.roles {
                if let Some(role) = guild.roles.get(rid) {
                    user_roles.push(role.name.clone());
                }
            }
        }
    } // Cache lock is dropped here

    if user_roles.is_empty() && !member.roles.is_empty() {
        debug!("Guild not in cache, fetching roles from API");
        let all_roles = guild_id.roles(&ctx.http)
            .await
            .map_err(|e| format!("Failed to get guild roles: {}", e))?;

        for rid in &member.roles {
            if let Some(role) = all_roles.get(rid) {
                user_roles.push(role.name.clone());
            }
        }
    }

    let guild = guild_id
        .to_partial_guild(&ctx.http)
        .await
        .map_err(|e| format!("Failed to get guild: {}", e))?;
    let is_owner = user_id == guild.owner_id;

    debug!("User {} roles in guild {}: {:?} (owner: {})", user_id, guild_id, user_roles, is_owner);

    if has_required_role(&user_roles, required_roles, is_owner) {
        Ok(())
    } else {
        Err(format!(
            "You need one of these roles to use this command: {}",
            required_roles.join(", ")
        ))
    }
}

fn has_required_role(user_roles: &[String], required_roles: &[&str], is_owner: bool) -> bool {
    if is_owner || user_roles.iter().any(|r| r.eq_ignore_ascii_case("admin")) {
        return true;
    }
    required_roles
        .iter()
        .any(|req| user_roles.iter().any(|ur| ur.eq_ignore_ascii_case(req)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_owner_and_admin_always_pass() {
        assert!(has_required_role(&[], &["Moderator"], true));
        assert!(has_required_role(&roles(&["ADMIN"]), &["Moderator"], false));
    }

    #[test]
    fn test_required_role_is_case_insensitive() {
        assert!(has_required_role(&roles(&["member", "moderator"]), &["Moderator"], false));
        assert!(!has_required_role(&roles(&["member"]), &["Moderator"], false));
    }
}
