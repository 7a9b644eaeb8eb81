use crate::models::Post;

/// Sort descending by like count and truncate to `limit`.
///
/// The sort is stable, so posts with equal like counts keep the relative
/// order the platform returned them in.
pub fn rank_top(mut posts: Vec<Post>, limit: usize) -> Vec<Post> {
    posts.sort_by(|a, b| b.like_count.cmp(&a.like_count));
    posts.truncate(limit);
    posts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, like_count: u32) -> Post {
        Post {
            id: id.to_string(),
            text: format!("post {}", id),
            author_username: "someone".to_string(),
            author_name: "Someone".to_string(),
            created_at: None,
            like_count,
            retweet_count: 0,
            reply_count: 0,
            quote_count: 0,
            url: Post::build_url(Some("someone"), id),
        }
    }

    #[test]
    fn sorts_descending_by_like_count() {
        let ranked = rank_top(vec![post("a", 3), post("b", 10), post("c", 7)], 10);

        let likes: Vec<u32> = ranked.iter().map(|p| p.like_count).collect();
        assert_eq!(likes, vec![10, 7, 3]);
    }

    #[test]
    fn truncates_to_limit() {
        let posts: Vec<Post> = (0..15).map(|i| post(&i.to_string(), i)).collect();

        let ranked = rank_top(posts, 10);

        assert_eq!(ranked.len(), 10);
        for pair in ranked.windows(2) {
            assert!(pair[0].like_count >= pair[1].like_count);
        }
    }

    #[test]
    fn equal_like_counts_keep_upstream_order() {
        // 15 candidates led by two posts tied at 5 likes.
        let mut posts = vec![post("first-five", 5), post("second-five", 5), post("three", 3)];
        posts.extend((0..12).map(|i| post(&format!("tail-{}", i), 1)));

        let ranked = rank_top(posts, 10);

        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].id, "first-five");
        assert_eq!(ranked[1].id, "second-five");
        assert_eq!(ranked[0].like_count, 5);
        assert_eq!(ranked[1].like_count, 5);
        assert_eq!(ranked[2].id, "three");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(rank_top(Vec::new(), 10).is_empty());
    }

    #[test]
    fn limit_larger_than_input_returns_everything() {
        let ranked = rank_top(vec![post("a", 1), post("b", 2)], 10);
        assert_eq!(ranked.len(), 2);
    }
}
