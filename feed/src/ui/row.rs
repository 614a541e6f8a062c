//! Feed row rendering.

use mockable::Clock;

use super::view::PostRowView;
use crate::domain::PostWithAuthor;
use crate::domain::relative_time::from_now;

/// Render one feed entry against the clock's current time.
pub fn render_row(entry: &PostWithAuthor, clock: &dyn Clock) -> PostRowView {
    PostRowView {
        key: entry.post.id().clone(),
        avatar_url: entry.author.profile_image_url().to_owned(),
        handle: format!("@{}", entry.author.username()),
        created_ago: from_now(clock, entry.post.created_at()),
        content: entry.post.content().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Author, AuthorId, Post, PostId};
    use chrono::{Duration, TimeZone, Utc};
    use mockable::MockClock;

    #[test]
    fn row_carries_handle_relative_time_and_verbatim_content() {
        let now = Utc
            .with_ymd_and_hms(2023, 5, 1, 12, 0, 0)
            .single()
            .expect("timestamp");
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(now);
        let author_id = AuthorId::new("user_1").expect("author id");
        let entry = PostWithAuthor {
            post: Post::new(
                PostId::new("p1").expect("post id"),
                "<b>not markup</b>",
                now - Duration::minutes(3),
                author_id.clone(),
            ),
            author: Author::new(author_id, "ada", "https://img/ada.png"),
        };

        let row = render_row(&entry, &clock);

        assert_eq!(row.key.as_str(), "p1");
        assert_eq!(row.handle, "@ada");
        assert_eq!(row.created_ago, "3 minutes ago");
        assert_eq!(row.content, "<b>not markup</b>");
        assert_eq!(row.avatar_url, "https://img/ada.png");
    }
}
