//! Course/student listings and assignment participation rows.
//!
//! Listings only drive selection; they are decoded here so the CLI can show
//! them, not transformed.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{coerce_field, coerce_records};

/// Identifiers arrive as either JSON numbers or strings.
fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_field("id", Some(&value)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(deserialize_with = "id")]
    pub course_id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CourseListing {
    #[serde(default, deserialize_with = "courses")]
    pub courses: Vec<Course>,
}

fn courses<'de, D>(deserializer: D) -> Result<Vec<Course>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_records("courses", value))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "id")]
    pub student_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StudentListing {
    #[serde(default, deserialize_with = "students")]
    pub students: Vec<Student>,
}

fn students<'de, D>(deserializer: D) -> Result<Vec<Student>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_records("students", value))
}

/// One student's submission status for one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationEntry {
    #[serde(deserialize_with = "id")]
    pub module_id: String,
    #[serde(default)]
    pub module_name: String,
    #[serde(deserialize_with = "id")]
    pub assignment_id: String,
    #[serde(default)]
    pub title: String,
    /// `On_Time`, `Floating` or `Late`, in any case.
    pub status: String,
}

/// Response of `/api/course-participations`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParticipationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "participations")]
    pub summary: Vec<ParticipationEntry>,
}

fn participations<'de, D>(deserializer: D) -> Result<Vec<ParticipationEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_records("summary", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_course_ids_accept_numbers() {
        let listing: CourseListing = serde_json::from_value(json!({
            "courses": [{"course_id": 7, "name": "Biology"}, {"course_id": "x9", "name": "Art"}]
        }))
        .unwrap();
        assert_eq!(listing.courses[0].course_id, "7");
        assert_eq!(listing.courses[1].course_id, "x9");
    }

    #[test]
    fn test_student_listing_skips_malformed() {
        let listing: StudentListing = serde_json::from_value(json!({
            "students": [{"student_id": 1}, {"name": "no id"}]
        }))
        .unwrap();
        assert_eq!(listing.students.len(), 1);
    }

    #[test]
    fn test_participation_response() {
        let response: ParticipationResponse = serde_json::from_value(json!({
            "success": true,
            "summary": [{
                "module_id": 1, "module_name": "Intro",
                "assignment_id": 11, "title": "Quiz 1", "status": "On_Time"
            }]
        }))
        .unwrap();
        assert_eq!(response.summary[0].assignment_id, "11");
        assert_eq!(response.summary[0].status, "On_Time");
    }
}
