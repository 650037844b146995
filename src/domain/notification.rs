use super::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Article,
    Comments,
    OnDemand,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub source_name: String,
    pub title: String,
    pub url: String,
    pub text: String,
}

impl Notification {
    pub fn article(item: &Item, summary: String) -> Self {
        Self {
            kind: NotificationKind::Article,
            source_name: item.source.to_string(),
            title: item.title.clone(),
            url: item.link.clone(),
            text: summary,
        }
    }

    pub fn comments(item: &Item, summary: String) -> Self {
        Self {
            kind: NotificationKind::Comments,
            source_name: item.source.to_string(),
            title: item.title.clone(),
            url: item.comment_url.clone(),
            text: summary,
        }
    }

    pub fn on_demand(url: &str, summary: String) -> Self {
        Self {
            kind: NotificationKind::OnDemand,
            source_name: String::new(),
            title: String::new(),
            url: url.to_string(),
            text: summary,
        }
    }

    /// Render as Slack mrkdwn
    pub fn format(&self) -> String {
        let mut message = match self.kind {
            NotificationKind::Article => {
                format!("[{}] *{}*\n<{}>", self.source_name, self.title, self.url)
            }
            NotificationKind::Comments => {
                format!("[{}] Comments on *{}*\n<{}>", self.source_name, self.title, self.url)
            }
            NotificationKind::OnDemand => format!("<{}>", self.url),
        };

        if !self.text.is_empty() {
            message.push_str("\n\n");
            message.push_str(&self.text);
        }

        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;

    fn item() -> Item {
        Item::new(
            Source::Reddit,
            "New Rust Features".to_string(),
            "https://blog.example.com/post".to_string(),
        )
        .with_comment_url("https://www.reddit.com/r/rust/comments/abc/new/".to_string())
    }

    #[test]
    fn test_article_format() {
        let formatted = Notification::article(&item(), "Async traits land.".to_string()).format();
        assert_eq!(
            formatted,
            "[reddit] *New Rust Features*\n<https://blog.example.com/post>\n\nAsync traits land."
        );
    }

    #[test]
    fn test_comments_format_uses_comment_url() {
        let formatted = Notification::comments(&item(), "People like it.".to_string()).format();
        assert_eq!(
            formatted,
            "[reddit] Comments on *New Rust Features*\n<https://www.reddit.com/r/rust/comments/abc/new/>\n\nPeople like it."
        );
    }

    #[test]
    fn test_format_without_text() {
        let formatted = Notification::on_demand("https://example.com", String::new()).format();
        assert_eq!(formatted, "<https://example.com>");
    }
}
