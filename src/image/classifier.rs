use crate::crawler::check_content_type;
use crate::state::VisitedSet;
use crate::url::Locator;
use reqwest::Client;

/// Decides whether a locator refers to an image
///
/// Inline locators are judged by their declared MIME type. Remote locators
/// are judged by the Content-Type of a HEAD response; any failure along the
/// way (transport error, non-2xx status, missing header) is a non-image.
#[derive(Debug, Clone)]
pub struct ResourceClassifier {
    client: Client,
}

impl ResourceClassifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Classifies a locator, memoizing the verdict in the visited set
    ///
    /// A locator that already carries a verdict is never classified again.
    pub async fn is_image(&self, visited: &VisitedSet, locator: &Locator) -> bool {
        if let Some(verdict) = visited.verdict(locator) {
            return verdict;
        }

        let verdict = self.classify(locator).await;
        visited.record_verdict(locator, verdict);
        verdict
    }

    /// Classifies a locator without consulting or updating any memo
    pub async fn classify(&self, locator: &Locator) -> bool {
        if let Some(data) = locator.inline_data() {
            return data.map(|d| d.is_image()).unwrap_or(false);
        }

        match check_content_type(&self.client, locator.as_str()).await {
            Ok(Some(content_type)) => is_image_type(&content_type),
            Ok(None) => false,
            Err(e) => {
                tracing::debug!("Classification failed for {}: {}", locator, e);
                false
            }
        }
    }
}

fn is_image_type(content_type: &str) -> bool {
    content_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}
