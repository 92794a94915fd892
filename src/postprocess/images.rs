use tracing::debug;

/// File-name fragments of agent logos, banners and other non-property images
pub const EXCLUDED_FRAGMENTS: [&str; 3] = ["_bp_pd_h.jpg", "branch_logo_", "_bp_mpu"];

/// Keep the URLs whose final path segment looks like a property photo.
pub fn filter_property_images(urls: &[String]) -> Vec<String> {
    urls.iter()
        .filter(|url| {
            let file = url.rsplit('/').next().unwrap_or(url);
            let excluded = EXCLUDED_FRAGMENTS.iter().any(|f| file.contains(f));
            if excluded {
                debug!("Logo detected: {}", url);
            } else {
                debug!("Image kept: {}", url);
            }
            !excluded
        })
        .cloned()
        .collect()
}
