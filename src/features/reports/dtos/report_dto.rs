use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::reports::models::{Category, Report, ReportStatus};

/// GeoJSON-style point carried on report submissions
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GeoPointDto {
    /// Must be "Point"
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: String,
    /// [longitude, latitude]
    #[schema(example = json!([106.8456, -6.2088]))]
    pub coordinates: [f64; 2],
}

impl GeoPointDto {
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// Validate the point shape and coordinate ranges
    pub fn validate_point(&self) -> Result<(), AppError> {
        if self.kind != "Point" {
            return Err(AppError::Validation(format!(
                "Unsupported location type '{}', expected 'Point'",
                self.kind
            )));
        }

        let [lon, lat] = self.coordinates;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(AppError::Validation(
                "Coordinates must be finite numbers".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(AppError::Validation(format!(
                "Longitude {} is out of range [-180, 180]",
                lon
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::Validation(format!(
                "Latitude {} is out of range [-90, 90]",
                lat
            )));
        }
        Ok(())
    }
}

impl From<&Report> for GeoPointDto {
    fn from(report: &Report) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [report.longitude, report.latitude],
        }
    }
}

/// Request body for submitting a report
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Large pothole on Jl. Sudirman")]
    pub title: String,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    #[schema(example = "Deep pothole near the bus stop, dangerous for motorbikes")]
    pub description: String,

    /// One of the five fixed categories
    pub category: Category,

    pub location: GeoPointDto,

    /// URL previously returned by the classify endpoint
    #[schema(example = "http://localhost:9000/civicfix-media/uploads/abc.jpg")]
    pub photo: Option<String>,
}

/// Request body for the admin status update
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
}

/// Report as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub location: GeoPointDto,
    pub photo_url: Option<String>,
    pub status: ReportStatus,
    pub submitted_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(report: Report) -> Self {
        let location = GeoPointDto::from(&report);
        Self {
            id: report.id,
            title: report.title,
            description: report.description,
            category: report.category,
            location,
            photo_url: report.photo_url,
            status: report.status,
            submitted_by: report.submitted_by,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lon: f64, lat: f64) -> GeoPointDto {
        GeoPointDto {
            kind: "Point".to_string(),
            coordinates: [lon, lat],
        }
    }

    #[test]
    fn test_valid_point_passes() {
        assert!(point(106.8456, -6.2088).validate_point().is_ok());
        assert!(point(-180.0, 90.0).validate_point().is_ok());
    }

    #[test]
    fn test_rejects_non_point_type() {
        let mut p = point(0.0, 0.0);
        p.kind = "Polygon".to_string();
        assert!(p.validate_point().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        assert!(point(181.0, 0.0).validate_point().is_err());
        assert!(point(0.0, -91.0).validate_point().is_err());
    }

    #[test]
    fn test_rejects_non_finite_coordinates() {
        assert!(point(f64::NAN, 0.0).validate_point().is_err());
        assert!(point(0.0, f64::INFINITY).validate_point().is_err());
    }

    #[test]
    fn test_create_dto_rejects_empty_title() {
        let dto = CreateReportDto {
            title: String::new(),
            description: "something".to_string(),
            category: Category::Trash,
            location: point(0.0, 0.0),
            photo: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_dto_rejects_unknown_category_at_parse_time() {
        let body = serde_json::json!({
            "title": "t",
            "description": "d",
            "category": "Graffiti",
            "location": { "type": "Point", "coordinates": [0.0, 0.0] }
        });
        assert!(serde_json::from_value::<CreateReportDto>(body).is_err());
    }
}
