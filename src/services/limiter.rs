use crate::domain::Item;

/// Caps how many unprocessed articles one run takes forward
pub trait ArticleLimiter: Send + Sync {
    fn limit(&self, items: Vec<Item>) -> Vec<Item>;
}

/// Keeps the first `max` items in received order
pub struct MaxArticleLimiter {
    max: usize,
}

impl MaxArticleLimiter {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl ArticleLimiter for MaxArticleLimiter {
    fn limit(&self, mut items: Vec<Item>) -> Vec<Item> {
        if items.len() > self.max {
            tracing::info!(
                available = items.len(),
                max = self.max,
                "limiting articles for this run"
            );
            items.truncate(self.max);
        }
        items
    }
}

/// Passes everything through
pub struct NoopLimiter;

impl ArticleLimiter for NoopLimiter {
    fn limit(&self, items: Vec<Item>) -> Vec<Item> {
        items
    }
}

/// `0` means unlimited
pub fn limiter_for(max: usize) -> Box<dyn ArticleLimiter> {
    if max == 0 {
        Box::new(NoopLimiter)
    } else {
        Box::new(MaxArticleLimiter::new(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| {
                Item::new(
                    Source::Reddit,
                    format!("Article {}", i),
                    format!("https://example.com/{}", i),
                )
            })
            .collect()
    }

    #[test]
    fn test_max_limiter_keeps_first_n_in_order() {
        let limited = MaxArticleLimiter::new(3).limit(items(8));

        let titles: Vec<&str> = limited.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Article 0", "Article 1", "Article 2"]);
    }

    #[test]
    fn test_max_limiter_under_cap_is_unchanged() {
        assert_eq!(MaxArticleLimiter::new(5).limit(items(2)).len(), 2);
        assert!(MaxArticleLimiter::new(5).limit(Vec::new()).is_empty());
    }

    #[test]
    fn test_noop_limiter() {
        assert_eq!(NoopLimiter.limit(items(50)).len(), 50);
    }

    #[test]
    fn test_limiter_for_zero_is_unlimited() {
        assert_eq!(limiter_for(0).limit(items(12)).len(), 12);
        assert_eq!(limiter_for(4).limit(items(12)).len(), 4);
    }
}
