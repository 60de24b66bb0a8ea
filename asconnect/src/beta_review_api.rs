// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Beta App Review.
//!
//! Builds must pass review before external testers can install them. A
//! submission tracks the review of one build. Review details hold the contact
//! and demo account information reviewers use, one set per app.

use {
    crate::{
        app_api::AppResponse,
        build_api::BuildResponse,
        resource::{Document, Documents, LinkageDocument, Relationship, Request},
        value::deserialize_optional_datetime,
        Result, TestFlight,
    },
    chrono::{DateTime, FixedOffset},
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BetaReviewState {
    WaitingForReview,
    InReview,
    Rejected,
    Approved,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaAppReviewSubmissionAttributes {
    pub beta_review_state: Option<BetaReviewState>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub submitted_date: Option<DateTime<FixedOffset>>,
}

pub type BetaAppReviewSubmissionResponse = Document<BetaAppReviewSubmissionAttributes>;
pub type BetaAppReviewSubmissionsResponse = Documents<BetaAppReviewSubmissionAttributes>;

#[derive(Clone, Debug, Serialize)]
pub struct BetaAppReviewSubmissionCreateRelationships {
    pub build: Relationship,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaAppReviewSubmissionFields {
    pub beta_app_review_submissions: Vec<String>,
    pub builds: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaAppReviewSubmissionFilter {
    pub beta_review_state: Vec<BetaReviewState>,
    /// Build IDs. The API requires this filter.
    pub build: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListBetaAppReviewSubmissionsQuery {
    pub fields: BetaAppReviewSubmissionFields,
    pub filter: BetaAppReviewSubmissionFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ReadBetaAppReviewSubmissionQuery {
    pub fields: BetaAppReviewSubmissionFields,
    pub include: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaAppReviewDetailAttributes {
    pub contact_email: Option<String>,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_phone: Option<String>,
    pub demo_account_name: Option<String>,
    pub demo_account_password: Option<String>,
    pub demo_account_required: Option<bool>,
    pub notes: Option<String>,
}

pub type BetaAppReviewDetailResponse = Document<BetaAppReviewDetailAttributes>;
pub type BetaAppReviewDetailsResponse = Documents<BetaAppReviewDetailAttributes>;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaAppReviewDetailUpdateAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_account_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_account_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetaAppReviewDetailFields {
    pub apps: Vec<String>,
    pub beta_app_review_details: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BetaAppReviewDetailFilter {
    /// App IDs. The API requires this filter.
    pub app: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListBetaAppReviewDetailsQuery {
    pub fields: BetaAppReviewDetailFields,
    pub filter: BetaAppReviewDetailFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ReadBetaAppReviewDetailQuery {
    pub fields: BetaAppReviewDetailFields,
    pub include: Vec<String>,
}

const SUBMISSIONS: &str = "/betaAppReviewSubmissions";
const DETAILS: &str = "/betaAppReviewDetails";

impl TestFlight {
    /// Submit a build for Beta App Review.
    pub async fn submit_for_beta_review(
        &self,
        build_id: &str,
    ) -> Result<BetaAppReviewSubmissionResponse> {
        let body = Request::link(
            "betaAppReviewSubmissions",
            BetaAppReviewSubmissionCreateRelationships {
                build: Relationship::new("builds", build_id),
            },
        );

        self.api.send_json(Method::POST, SUBMISSIONS, &body).await
    }

    pub async fn list_beta_app_review_submissions(
        &self,
        query: &ListBetaAppReviewSubmissionsQuery,
    ) -> Result<BetaAppReviewSubmissionsResponse> {
        self.api.get_json(SUBMISSIONS, Some(query)).await
    }

    pub async fn get_beta_app_review_submission(
        &self,
        id: &str,
        query: &ReadBetaAppReviewSubmissionQuery,
    ) -> Result<BetaAppReviewSubmissionResponse> {
        self.api
            .get_json(&format!("{SUBMISSIONS}/{id}"), Some(query))
            .await
    }

    pub async fn get_beta_app_review_submission_build(&self, id: &str) -> Result<BuildResponse> {
        self.api
            .get_json::<_, ()>(&format!("{SUBMISSIONS}/{id}/build"), None)
            .await
    }

    pub async fn get_beta_app_review_submission_build_id(
        &self,
        id: &str,
    ) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(&format!("{SUBMISSIONS}/{id}/relationships/build"), None)
            .await
    }

    pub async fn list_beta_app_review_details(
        &self,
        query: &ListBetaAppReviewDetailsQuery,
    ) -> Result<BetaAppReviewDetailsResponse> {
        self.api.get_json(DETAILS, Some(query)).await
    }

    pub async fn get_beta_app_review_detail(
        &self,
        id: &str,
        query: &ReadBetaAppReviewDetailQuery,
    ) -> Result<BetaAppReviewDetailResponse> {
        self.api
            .get_json(&format!("{DETAILS}/{id}"), Some(query))
            .await
    }

    pub async fn get_beta_app_review_detail_app(&self, id: &str) -> Result<AppResponse> {
        self.api
            .get_json::<_, ()>(&format!("{DETAILS}/{id}/app"), None)
            .await
    }

    pub async fn get_beta_app_review_detail_app_id(&self, id: &str) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(&format!("{DETAILS}/{id}/relationships/app"), None)
            .await
    }

    pub async fn modify_beta_app_review_detail(
        &self,
        id: &str,
        attributes: BetaAppReviewDetailUpdateAttributes,
    ) -> Result<BetaAppReviewDetailResponse> {
        let body: Request<_> = Request::update("betaAppReviewDetails", id, attributes);

        self.api
            .send_json(Method::PATCH, &format!("{DETAILS}/{id}"), &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::query::serialize_query, serde_json::json};

    #[test]
    fn parse_submission() {
        let doc: BetaAppReviewSubmissionsResponse = serde_json::from_value(json!({
            "data": [
                {
                    "id": "S1",
                    "type": "betaAppReviewSubmissions",
                    "attributes": {
                        "betaReviewState": "WAITING_FOR_REVIEW",
                        "submittedDate": "2024-03-01T08:00:00.000+0000",
                    },
                },
                {
                    "id": "S2",
                    "type": "betaAppReviewSubmissions",
                    "attributes": {"betaReviewState": "SOMETHING_ELSE"},
                },
            ],
        }))
        .unwrap();

        let first = doc.data[0].attributes.as_ref().unwrap();
        assert_eq!(first.beta_review_state, Some(BetaReviewState::WaitingForReview));
        assert!(first.submitted_date.is_some());
        assert_eq!(
            doc.data[1].attributes.as_ref().unwrap().beta_review_state,
            Some(BetaReviewState::Unknown)
        );
    }

    #[test]
    fn submission_query() {
        let query = ListBetaAppReviewSubmissionsQuery {
            filter: BetaAppReviewSubmissionFilter {
                build: vec!["B1".into()],
                beta_review_state: vec![BetaReviewState::InReview],
            },
            ..Default::default()
        };

        assert_eq!(
            serialize_query(&query).unwrap().as_deref(),
            Some("filter[betaReviewState]=IN_REVIEW&filter[build]=B1")
        );
    }

    #[test]
    fn detail_update_body() {
        let body: Request<_> = Request::update(
            "betaAppReviewDetails",
            "D1",
            BetaAppReviewDetailUpdateAttributes {
                contact_email: Some("qa@example.com".into()),
                demo_account_required: Some(false),
                ..Default::default()
            },
        );

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "data": {
                    "type": "betaAppReviewDetails",
                    "id": "D1",
                    "attributes": {"contactEmail": "qa@example.com", "demoAccountRequired": false},
                },
            })
        );
    }
}
