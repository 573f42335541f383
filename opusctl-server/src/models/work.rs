//! Work request schemas and validated values

use serde::Deserialize;
use uuid::Uuid;

use super::validation::{nullable, parse_id, Validate};
use super::{ValidationError, WorkTitle};

/// Trim an optional free-text field, dropping it when nothing is left.
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// POST /works body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub work_type: Option<String>,
    pub composer_id: Option<String>,
    pub duration_min: Option<f64>,
    pub instrumentation: Option<String>,
    pub notes: Option<String>,
}

/// Fully validated work, ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewWork {
    pub title: WorkTitle,
    pub year: Option<i32>,
    pub work_type: Option<String>,
    pub composer_id: Uuid,
    pub duration_min: Option<f64>,
    pub instrumentation: Option<String>,
    pub notes: Option<String>,
}

impl Validate for CreateWorkRequest {
    type Output = NewWork;

    fn validate(self) -> Result<NewWork, ValidationError> {
        let title = WorkTitle::required(self.title.as_deref())?;
        let composer_id = match self.composer_id.as_deref() {
            Some(id) => parse_id("composerId", id)?,
            None => return Err(ValidationError::Missing { field: "composerId" }),
        };

        Ok(NewWork {
            title,
            year: self.year,
            work_type: trimmed(self.work_type),
            composer_id,
            duration_min: self.duration_min,
            instrumentation: self.instrumentation,
            notes: self.notes,
        })
    }
}

/// PUT /works/{id} body.
///
/// Absent fields are left unchanged. `null` clears the optional fields;
/// for `title` and `composerId` it means "keep".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub year: Option<Option<i32>>,
    #[serde(default, rename = "type", deserialize_with = "nullable")]
    pub work_type: Option<Option<String>>,
    pub composer_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub duration_min: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub instrumentation: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

/// Validated partial update of a work
///
/// `Some(None)` on an optional column sets it to NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkPatch {
    pub title: Option<WorkTitle>,
    pub year: Option<Option<i32>>,
    pub work_type: Option<Option<String>>,
    pub composer_id: Option<Uuid>,
    pub duration_min: Option<Option<f64>>,
    pub instrumentation: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl Validate for UpdateWorkRequest {
    type Output = WorkPatch;

    fn validate(self) -> Result<WorkPatch, ValidationError> {
        Ok(WorkPatch {
            title: self.title.as_deref().map(WorkTitle::new).transpose()?,
            year: self.year,
            work_type: self.work_type.map(trimmed),
            composer_id: self
                .composer_id
                .as_deref()
                .map(|id| parse_id("composerId", id))
                .transpose()?,
            duration_min: self.duration_min,
            instrumentation: self.instrumentation,
            notes: self.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPOSER: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[test]
    fn valid_work() {
        let req: CreateWorkRequest = serde_json::from_str(&format!(
            r#"{{"title":"  Boléro ","type":" ballet ","composerId":"{}","durationMin":15.5}}"#,
            COMPOSER
        ))
        .unwrap();
        let work = req.validate().unwrap();
        assert_eq!(work.title.as_str(), "Boléro");
        assert_eq!(work.work_type.as_deref(), Some("ballet"));
        assert_eq!(work.composer_id.to_string(), COMPOSER);
        assert_eq!(work.duration_min, Some(15.5));
    }

    #[test]
    fn title_and_composer_required() {
        let req = CreateWorkRequest {
            composer_id: Some(COMPOSER.into()),
            ..Default::default()
        };
        assert_eq!(
            req.validate().unwrap_err(),
            ValidationError::Missing { field: "title" }
        );

        let req = CreateWorkRequest {
            title: Some("Boléro".into()),
            ..Default::default()
        };
        assert_eq!(
            req.validate().unwrap_err(),
            ValidationError::Missing { field: "composerId" }
        );
    }

    #[test]
    fn malformed_composer_id() {
        let req = CreateWorkRequest {
            title: Some("Boléro".into()),
            composer_id: Some("not-an-id".into()),
            ..Default::default()
        };
        assert!(matches!(
            req.validate().unwrap_err(),
            ValidationError::InvalidFormat { field: "composerId", .. }
        ));
    }

    #[test]
    fn patch_retrims_title() {
        let patch = UpdateWorkRequest {
            title: Some(" Pavane ".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(patch.title.unwrap().as_str(), "Pavane");

        let err = UpdateWorkRequest {
            title: Some(" ".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "title" });
    }

    #[test]
    fn patch_null_clears_optional_fields() {
        let req: UpdateWorkRequest =
            serde_json::from_str(r#"{"year":null,"type":"  ","notes":"Revised"}"#).unwrap();
        let patch = req.validate().unwrap();
        assert_eq!(patch.year, Some(None));
        assert_eq!(patch.work_type, Some(None));
        assert_eq!(patch.notes, Some(Some("Revised".into())));
        assert_eq!(patch.duration_min, None);
    }
}
