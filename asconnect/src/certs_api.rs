// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Signing certificates.

use {
    crate::{
        resource::{Document, Documents, Request},
        value::deserialize_optional_datetime,
        Error, Provisioning, Result,
    },
    base64::{engine::general_purpose::STANDARD as STANDARD_ENGINE, Engine},
    chrono::{DateTime, FixedOffset},
    rand::rngs::OsRng,
    reqwest::Method,
    rsa::{
        pkcs8::{EncodePrivateKey, LineEnding},
        RsaPrivateKey,
    },
    serde::{Deserialize, Serialize},
    std::{io::Write, path::Path},
    x509_certificate::{InMemorySigningKeyPair, X509CertificateBuilder},
};

/// A freshly generated RSA key and a PEM encoded signing request for it.
pub struct CertificateSigningRequest {
    pub private_key: RsaPrivateKey,
    pub csr_pem: String,
}

/// Generate a 2048 bit RSA key and a certificate signing request for it.
pub fn generate_csr() -> Result<CertificateSigningRequest> {
    let private_key = RsaPrivateKey::new(&mut OsRng, 2048).map_err(csr_error)?;
    let der = private_key.to_pkcs8_der().map_err(csr_error)?;
    let key = InMemorySigningKeyPair::from_pkcs8_der(der.as_bytes()).map_err(csr_error)?;

    let mut builder = X509CertificateBuilder::default();
    builder
        .subject()
        .append_common_name_utf8_string("Apple Code Signing CSR")
        .map_err(|e| Error::CertificateRequest(format!("{e:?}")))?;

    let csr_pem = builder
        .create_certificate_signing_request(&key)
        .map_err(csr_error)?
        .encode_pem()
        .map_err(csr_error)?;

    Ok(CertificateSigningRequest {
        private_key,
        csr_pem,
    })
}

fn csr_error(e: impl std::fmt::Display) -> Error {
    Error::CertificateRequest(e.to_string())
}

/// PEM encode the certificate carried by a create or read response.
pub fn certificate_pem(response: &CertificateResponse) -> Result<String> {
    let content = response
        .data
        .attributes
        .as_ref()
        .and_then(|a| a.certificate_content.as_deref())
        .ok_or_else(|| {
            Error::UnexpectedResponse(format!(
                "certificate {} lacks certificateContent",
                response.data.id
            ))
        })?;

    let der = STANDARD_ENGINE.decode(content).map_err(|e| {
        Error::UnexpectedResponse(format!(
            "certificate {} has invalid certificateContent: {e}",
            response.data.id
        ))
    })?;

    Ok(pem::encode(&pem::Pem::new("CERTIFICATE", der)))
}

/// Issue a new signing certificate and write it, preceded by its private key, to `pem`.
pub async fn generate_signing_certificate(
    provisioning: &Provisioning,
    ty: CertificateType,
    pem: &Path,
) -> Result<CertificateResponse> {
    let csr = tokio::task::spawn_blocking(generate_csr)
        .await
        .map_err(csr_error)??;

    let response = provisioning
        .create_certificate(csr.csr_pem.clone(), ty)
        .await?;

    let cer = certificate_pem(&response)?;

    let key_pem = csr
        .private_key
        .to_pkcs8_pem(LineEnding::CRLF)
        .map_err(csr_error)?;

    let mut f = std::fs::File::create(pem)?;
    f.write_all(key_pem.as_bytes())?;
    f.write_all(cer.as_bytes())?;

    log::info!("wrote {} certificate {} to {}", ty, response.data.id, pem.display());

    Ok(response)
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateType {
    Development,
    Distribution,
    IosDevelopment,
    IosDistribution,
    MacAppDevelopment,
    MacAppDistribution,
    MacInstallerDistribution,
    DeveloperIdApplication,
    DeveloperIdKext,
}

impl std::fmt::Display for CertificateType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Development => "DEVELOPMENT",
            Self::Distribution => "DISTRIBUTION",
            Self::IosDevelopment => "IOS_DEVELOPMENT",
            Self::IosDistribution => "IOS_DISTRIBUTION",
            Self::MacAppDevelopment => "MAC_APP_DEVELOPMENT",
            Self::MacAppDistribution => "MAC_APP_DISTRIBUTION",
            Self::MacInstallerDistribution => "MAC_INSTALLER_DISTRIBUTION",
            Self::DeveloperIdApplication => "DEVELOPER_ID_APPLICATION",
            Self::DeveloperIdKext => "DEVELOPER_ID_KEXT",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateAttributes {
    pub certificate_content: Option<String>,
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub expiration_date: Option<DateTime<FixedOffset>>,
    pub name: Option<String>,
    pub platform: Option<String>,
    pub serial_number: Option<String>,
    /// Kept as a string so unknown types still decode.
    pub certificate_type: Option<String>,
}

pub type CertificateResponse = Document<CertificateAttributes>;
pub type CertificatesResponse = Documents<CertificateAttributes>;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateCreateAttributes {
    pub certificate_type: CertificateType,
    pub csr_content: String,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateFields {
    pub certificates: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateFilter {
    pub id: Vec<String>,
    pub certificate_type: Vec<CertificateType>,
    pub display_name: Vec<String>,
    pub serial_number: Vec<String>,
}

/// Query for [Provisioning::list_certificates].
///
/// `sort` accepts `certificateType`, `displayName`, `id`, `serialNumber`,
/// each optionally prefixed by `-`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ListCertificatesQuery {
    pub fields: CertificateFields,
    pub filter: CertificateFilter,
    pub limit: Option<u32>,
    pub sort: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ReadCertificateQuery {
    pub fields: CertificateFields,
}

const CERTIFICATES: &str = "/certificates";

impl Provisioning {
    /// Issue a certificate for a PEM encoded signing request.
    pub async fn create_certificate(
        &self,
        csr: String,
        ty: CertificateType,
    ) -> Result<CertificateResponse> {
        let body: Request<_> = Request::create(
            "certificates",
            CertificateCreateAttributes {
                certificate_type: ty,
                csr_content: csr,
            },
        );

        self.api.send_json(Method::POST, CERTIFICATES, &body).await
    }

    pub async fn list_certificates(
        &self,
        query: &ListCertificatesQuery,
    ) -> Result<CertificatesResponse> {
        self.api.get_json(CERTIFICATES, Some(query)).await
    }

    pub async fn get_certificate(
        &self,
        id: &str,
        query: &ReadCertificateQuery,
    ) -> Result<CertificateResponse> {
        self.api
            .get_json(&format!("{CERTIFICATES}/{id}"), Some(query))
            .await
    }

    pub async fn revoke_certificate(&self, id: &str) -> Result<()> {
        self.api
            .send_void::<()>(Method::DELETE, &format!("{CERTIFICATES}/{id}"), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::query::serialize_query, serde_json::json};

    #[test]
    fn certificate_type_names() {
        for ty in <CertificateType as clap::ValueEnum>::value_variants() {
            assert_eq!(serde_json::to_value(ty).unwrap(), json!(ty.to_string()));
        }
    }

    #[test]
    fn certificate_content_to_pem() {
        let mut doc: CertificateResponse = serde_json::from_value(json!({
            "data": {
                "id": "C1",
                "type": "certificates",
                "attributes": {"certificateContent": "MIIB"},
            },
        }))
        .unwrap();

        let pem = certificate_pem(&doc).unwrap();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));

        doc.data.attributes = Some(CertificateAttributes {
            certificate_content: Some("not base64!".into()),
            ..Default::default()
        });
        assert!(matches!(
            certificate_pem(&doc),
            Err(Error::UnexpectedResponse(_))
        ));

        doc.data.attributes = None;
        assert!(matches!(
            certificate_pem(&doc),
            Err(Error::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn list_query() {
        let query = ListCertificatesQuery {
            filter: CertificateFilter {
                certificate_type: vec![CertificateType::DeveloperIdApplication],
                ..Default::default()
            },
            limit: Some(200),
            ..Default::default()
        };

        assert_eq!(
            serialize_query(&query).unwrap().as_deref(),
            Some("filter[certificateType]=DEVELOPER_ID_APPLICATION&limit=200")
        );
    }

    #[test]
    fn parse_certificate() {
        let doc: CertificateResponse = serde_json::from_value(json!({
            "data": {
                "id": "ABC",
                "type": "certificates",
                "attributes": {
                    "certificateType": "DISTRIBUTION",
                    "displayName": "Jane Doe",
                    "expirationDate": "2025-01-01T00:00:00.000+0000",
                    "serialNumber": "1234",
                },
            },
        }))
        .unwrap();

        let attributes = doc.data.attributes.unwrap();
        assert_eq!(attributes.certificate_type.as_deref(), Some("DISTRIBUTION"));
        assert_eq!(
            attributes.expiration_date.unwrap().to_rfc3339(),
            "2025-01-01T00:00:00+00:00"
        );
    }
}
