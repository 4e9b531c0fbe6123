use url::Url;

use crate::error::AppError;

/// Builds the absolute URLs embedded in emails and redirects.
#[derive(Debug, Clone)]
pub struct Links {
    api_base: Url,
    web_base: Url,
}

impl Links {
    pub fn new(api_base: Url, web_base: Url) -> Result<Self, AppError> {
        for (name, url) in [("API_BASE_URL", &api_base), ("WEB_BASE_URL", &web_base)] {
            if url.cannot_be_a_base() {
                return Err(AppError::Config(format!("{name} must be a base URL, got {url}")));
            }
        }
        Ok(Self { api_base, web_base })
    }

    pub fn trip_confirmation(&self, trip_id: &str) -> Url {
        with_segments(&self.api_base, &["trips", trip_id, "confirm"])
    }

    pub fn participant_confirmation(&self, participant_id: &str) -> Url {
        with_segments(&self.api_base, &["participants", participant_id, "confirm"])
    }

    pub fn trip_page(&self, trip_id: &str) -> Url {
        with_segments(&self.web_base, &["trips", trip_id])
    }
}

fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // checked in Links::new
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
