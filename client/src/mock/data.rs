use jiff::Timestamp;
use payloads::responses::{Paginated, Pagination, User};
use payloads::{Role, UserId, UserStatus};

fn seed_user(
    id: i64,
    name: &str,
    email: &str,
    role: Role,
    status: UserStatus,
    created_at: &str,
) -> User {
    let initial = name.chars().next().unwrap_or('U');
    User {
        id: UserId(id),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar: Some(format!(
            "https://via.placeholder.com/40?text={initial}"
        )),
        status,
        created_at: created_at.parse::<Timestamp>().unwrap(),
        updated_at: None,
    }
}

/// The demo dataset. The first two entries back the demo credentials
/// (admin@example.com / user@example.com).
pub fn seed_users() -> Vec<User> {
    vec![
        seed_user(
            1,
            "Alice Warren",
            "admin@example.com",
            Role::Admin,
            UserStatus::Active,
            "2024-01-15T10:30:00Z",
        ),
        seed_user(
            2,
            "Ben Castillo",
            "user@example.com",
            Role::User,
            UserStatus::Active,
            "2024-01-16T14:20:00Z",
        ),
        seed_user(
            3,
            "Chloe Nguyen",
            "chloe.nguyen@example.com",
            Role::User,
            UserStatus::Inactive,
            "2024-01-17T09:15:00Z",
        ),
        seed_user(
            4,
            "Daniel Reyes",
            "daniel.reyes@example.com",
            Role::User,
            UserStatus::Active,
            "2024-01-18T16:45:00Z",
        ),
        seed_user(
            5,
            "Elena Petrova",
            "elena.petrova@example.com",
            Role::Admin,
            UserStatus::Active,
            "2024-01-19T11:30:00Z",
        ),
        seed_user(
            6,
            "Farid Khan",
            "farid.khan@example.com",
            Role::User,
            UserStatus::Active,
            "2024-01-20T13:20:00Z",
        ),
        seed_user(
            7,
            "Grace Liu",
            "grace.liu@example.com",
            Role::User,
            UserStatus::Inactive,
            "2024-01-21T08:10:00Z",
        ),
        seed_user(
            8,
            "Henry Adeyemi",
            "henry.adeyemi@example.com",
            Role::User,
            UserStatus::Active,
            "2024-01-22T15:40:00Z",
        ),
    ]
}

/// Slice a dataset into one page, 1-based. Pages past the end are empty
/// but still carry the correct totals.
pub fn paginate<T: Clone>(
    items: &[T],
    page: u32,
    page_size: u32,
) -> Paginated<T> {
    let start = (page.max(1) as usize - 1).saturating_mul(page_size as usize);
    let end = start.saturating_add(page_size as usize).min(items.len());
    let data = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };
    Paginated {
        data,
        pagination: Pagination::new(page, page_size, items.len() as u64),
    }
}
