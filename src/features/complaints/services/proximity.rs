use uuid::Uuid;

use crate::core::config::GroupingConfig;
use crate::core::error::Result;
use crate::features::complaints::geo::{haversine_distance, BoundingBox};
use crate::features::complaints::models::Complaint;
use crate::features::complaints::store::StoreSession;

/// Finds the grouping target for a set of coordinates, if any.
///
/// Candidates come back newest-first; the first one within the search
/// radius wins and the scan stops there. This is first-under-threshold in
/// recency order, not globally nearest. Changing it to a nearest-neighbor
/// search would change grouping outcomes under contention.
#[derive(Debug, Clone, Copy)]
pub struct ProximitySearch {
    config: GroupingConfig,
}

impl ProximitySearch {
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    /// Searches open and under-review complaints of the given category
    /// around `(lat, lon)`. Matching rows stay locked in the session until
    /// it ends.
    pub async fn find_nearby(
        &self,
        session: &mut dyn StoreSession,
        category_id: Uuid,
        lat: f64,
        lon: f64,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<(Complaint, f64)>> {
        let bbox = BoundingBox::around(lat, lon, self.config.bbox_delta_degrees);
        let candidates = session
            .candidates_for_update(category_id, bbox, exclude_id)
            .await?;

        Ok(Self::first_within_radius(
            candidates,
            lat,
            lon,
            self.config.search_radius_meters,
        ))
    }

    fn first_within_radius(
        candidates: Vec<Complaint>,
        lat: f64,
        lon: f64,
        radius_meters: f64,
    ) -> Option<(Complaint, f64)> {
        for candidate in candidates {
            let distance = haversine_distance(lat, lon, candidate.lat_f64(), candidate.lon_f64());
            if distance <= radius_meters {
                return Some((candidate, distance));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::complaints::models::{Author, ComplaintStatus, Jurisdiction};
    use chrono::Utc;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;

    const BASE_LAT: f64 = -26.3045;
    const BASE_LON: f64 = -48.8487;

    fn complaint_at(lat: f64, lon: f64) -> Complaint {
        Complaint {
            id: Uuid::now_v7(),
            title: "Poste sem luz".to_string(),
            description: "Poste apagado há uma semana".to_string(),
            category_id: Uuid::now_v7(),
            latitude: Decimal::from_f64(lat).unwrap(),
            longitude: Decimal::from_f64(lon).unwrap(),
            address: None,
            city: None,
            state: None,
            photo_url: None,
            jurisdiction: Jurisdiction::Municipal,
            status: ComplaintStatus::Open,
            author: Author::Guest {
                name: "Carlos".to_string(),
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_first_match_wins_over_nearer_later_match() {
        // Candidate order is recency order. The first is ~50m away, the
        // second sits exactly at the query point; the first still wins.
        let farther_but_newer = complaint_at(BASE_LAT + 0.000449, BASE_LON);
        let nearer_but_older = complaint_at(BASE_LAT, BASE_LON);
        let expected = farther_but_newer.id;

        let result = ProximitySearch::first_within_radius(
            vec![farther_but_newer, nearer_but_older],
            BASE_LAT,
            BASE_LON,
            100.0,
        );

        let (complaint, distance) = result.unwrap();
        assert_eq!(complaint.id, expected);
        assert!(distance > 45.0 && distance < 55.0);
    }

    #[test]
    fn test_out_of_radius_candidates_are_skipped() {
        let far = complaint_at(BASE_LAT + 0.001797, BASE_LON);
        let near = complaint_at(BASE_LAT + 0.000449, BASE_LON);
        let expected = near.id;

        let result =
            ProximitySearch::first_within_radius(vec![far, near], BASE_LAT, BASE_LON, 100.0);

        assert_eq!(result.unwrap().0.id, expected);
    }

    #[test]
    fn test_no_candidate_within_radius() {
        let far = complaint_at(BASE_LAT + 0.001797, BASE_LON);

        let result = ProximitySearch::first_within_radius(vec![far], BASE_LAT, BASE_LON, 100.0);

        assert!(result.is_none());
    }

    #[test]
    fn test_empty_candidate_set() {
        let result = ProximitySearch::first_within_radius(vec![], BASE_LAT, BASE_LON, 100.0);

        assert!(result.is_none());
    }
}
