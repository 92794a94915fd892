pub mod geocode;
pub mod images;
pub mod price;

pub use geocode::{add_geocode_data, Geocode, GoogleGeocoder};
pub use images::filter_property_images;

use crate::models::PropertyRecord;
use crate::scrapers::SiteAdapter;

/// Run price parsing, image filtering and geocoding, in that order.
/// Returns whether coordinates were attached.
pub async fn post_process(
    site: &dyn SiteAdapter,
    geocoder: &dyn Geocode,
    record: &mut PropertyRecord,
) -> bool {
    site.parse_price(record);
    record.right_images = filter_property_images(&record.images);
    add_geocode_data(geocoder, record).await
}
