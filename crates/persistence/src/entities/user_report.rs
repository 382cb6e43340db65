//! User report entity (database row mapping).

use domain::models::{ReportUser, UserPostStats, UserReportQuery};
use sqlx::FromRow;

/// Database row mapping for a user joined with post activity statistics.
#[derive(Debug, Clone, FromRow)]
pub struct UserReportEntity {
    // User fields
    pub id: String,
    pub username: String,
    pub email: String,
    pub create_at: i64,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub roles: String,
    pub delete_at: i64,
    pub last_login: i64,
    // Activity
    pub last_status_at: Option<i64>,
    pub last_post_date: Option<i64>,
    pub days_active: Option<i32>,
    pub total_posts: Option<i64>,
}

impl From<UserReportEntity> for UserReportQuery {
    fn from(entity: UserReportEntity) -> Self {
        Self {
            user: ReportUser {
                id: entity.id,
                username: entity.username,
                email: entity.email,
                create_at: entity.create_at,
                first_name: entity.first_name,
                last_name: entity.last_name,
                nickname: entity.nickname,
                roles: entity.roles,
                delete_at: entity.delete_at,
            },
            stats: UserPostStats {
                last_login: entity.last_login,
                last_status_at: entity.last_status_at,
                last_post_date: entity.last_post_date,
                days_active: entity.days_active,
                total_posts: entity.total_posts,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_into_query_row() {
        let entity = UserReportEntity {
            id: "abcdefghijklmnopqrstuvwxyz".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            create_at: 1_700_000_000_000,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            nickname: String::new(),
            roles: "system_user system_admin".to_string(),
            delete_at: 0,
            last_login: 1_710_000_000_000,
            last_status_at: Some(1_710_000_500_000),
            last_post_date: None,
            days_active: None,
            total_posts: None,
        };

        let row: UserReportQuery = entity.into();
        assert_eq!(row.user.username, "ada");
        assert_eq!(row.user.full_name(), "Ada Lovelace");
        assert_eq!(row.user.roles, "system_user system_admin");
        assert_eq!(row.stats.last_login, 1_710_000_000_000);
        assert_eq!(row.stats.last_status_at, Some(1_710_000_500_000));
        assert_eq!(row.stats.total_posts, None);
    }
}
