// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export compliance declarations.

use {
    crate::{
        app_api::AppResponse,
        resource::{Document, Documents, LinkageDocument, Relationships},
        value::deserialize_optional_datetime,
        Result, TestFlight,
    },
    chrono::{DateTime, FixedOffset},
    reqwest::Method,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEncryptionDeclarationAttributes {
    /// E.g. `APPROVED`, `IN_REVIEW`, `REJECTED`.
    pub app_encryption_declaration_state: Option<String>,
    pub available_on_french_store: Option<bool>,
    pub code_value: Option<String>,
    pub contains_proprietary_cryptography: Option<bool>,
    pub contains_third_party_cryptography: Option<bool>,
    pub document_name: Option<String>,
    pub document_type: Option<String>,
    pub document_url: Option<String>,
    pub exempt: Option<bool>,
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub uploaded_date: Option<DateTime<FixedOffset>>,
    pub uses_encryption: Option<bool>,
}

pub type AppEncryptionDeclarationResponse = Document<AppEncryptionDeclarationAttributes>;
pub type AppEncryptionDeclarationsResponse = Documents<AppEncryptionDeclarationAttributes>;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEncryptionDeclarationFields {
    pub apps: Vec<String>,
    pub app_encryption_declarations: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct AppEncryptionDeclarationFilter {
    pub app: Vec<String>,
    pub builds: Vec<String>,
    pub platform: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ListAppEncryptionDeclarationsQuery {
    pub fields: AppEncryptionDeclarationFields,
    pub filter: AppEncryptionDeclarationFilter,
    pub include: Vec<String>,
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ReadAppEncryptionDeclarationQuery {
    pub fields: AppEncryptionDeclarationFields,
    pub include: Vec<String>,
}

const DECLARATIONS: &str = "/appEncryptionDeclarations";

impl TestFlight {
    pub async fn list_app_encryption_declarations(
        &self,
        query: &ListAppEncryptionDeclarationsQuery,
    ) -> Result<AppEncryptionDeclarationsResponse> {
        self.api.get_json(DECLARATIONS, Some(query)).await
    }

    pub async fn get_app_encryption_declaration(
        &self,
        id: &str,
        query: &ReadAppEncryptionDeclarationQuery,
    ) -> Result<AppEncryptionDeclarationResponse> {
        self.api
            .get_json(&format!("{DECLARATIONS}/{id}"), Some(query))
            .await
    }

    pub async fn get_app_encryption_declaration_app(&self, id: &str) -> Result<AppResponse> {
        self.api
            .get_json::<_, ()>(&format!("{DECLARATIONS}/{id}/app"), None)
            .await
    }

    pub async fn get_app_encryption_declaration_app_id(
        &self,
        id: &str,
    ) -> Result<LinkageDocument> {
        self.api
            .get_json::<_, ()>(&format!("{DECLARATIONS}/{id}/relationships/app"), None)
            .await
    }

    /// Declare that builds use the encryption described by a declaration.
    pub async fn assign_app_encryption_declaration_builds(
        &self,
        id: &str,
        build_ids: &[String],
    ) -> Result<()> {
        let body = Relationships::new("builds", build_ids);

        self.api
            .send_void(
                Method::POST,
                &format!("{DECLARATIONS}/{id}/relationships/builds"),
                Some(&body),
            )
            .await
    }
}
