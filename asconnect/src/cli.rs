// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use {
    crate::{
        build_api::{BuildAttributes, BuildFilter, ListBuildsQuery},
        bundle_api::{
            BundleIdAttributes, BundleIdPlatform, ListBundleIdsQuery, ReadBundleIdQuery,
        },
        certs_api::{
            self, certificate_pem, CertificateAttributes, CertificateType, ListCertificatesQuery,
            ReadCertificateQuery,
        },
        device_api::{DeviceAttributes, DeviceFields, ListDevicesQuery},
        finance_api::{
            FinanceReportFilter, FinanceReportType, FinanceReportsQuery, SalesReportFilter,
            SalesReportFrequency, SalesReportSubType, SalesReportType, SalesReportsQuery,
        },
        profile_api::{ListProfilesQuery, ProfileAttributes, ProfileType, ReadProfileQuery},
        resource::Resource,
        user_api::{ListUsersQuery, UserAttributes},
        AppStoreConnect, UnifiedApiKey,
    },
    anyhow::{anyhow, Context, Result},
    base64::{engine::general_purpose::STANDARD as STANDARD_ENGINE, Engine},
    chrono::{DateTime, FixedOffset},
    clap::{Parser, Subcommand},
    std::{
        io::Write,
        path::{Path, PathBuf},
    },
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Path to unified api key. Falls back to the ASC_* environment variables.
    #[clap(long, global = true)]
    pub api_key: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Commands,
}

impl Args {
    pub async fn run(self) -> Result<()> {
        self.command.run(self.api_key.as_deref()).await
    }
}

/// Load the API key from `path`, or from the environment when no path is given.
pub fn load_api_key(path: Option<&Path>) -> Result<UnifiedApiKey> {
    match path {
        Some(path) => UnifiedApiKey::from_json_path(path)
            .with_context(|| format!("reading api key from {}", path.display())),
        None => UnifiedApiKey::from_env().context("no --api-key given"),
    }
}

fn connect(api_key: Option<&Path>) -> Result<AppStoreConnect> {
    Ok(AppStoreConnect::from_unified_api_key(&load_api_key(api_key)?)?)
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generates a PEM encoded RSA2048 signing key and a certificate for it
    GenerateSigningCertificate {
        /// Certificate type, e.g. development, distribution or developer-id-application.
        #[clap(long)]
        r#type: CertificateType,
        /// Path to write the private key and certificate to
        pem: PathBuf,
    },
    /// Creates a unified api key.
    CreateApiKey {
        /// Issuer id.
        #[clap(long)]
        issuer_id: String,
        /// Key id.
        #[clap(long)]
        key_id: String,
        /// Path to private key.
        private_key: PathBuf,
    },
    /// Prints a freshly minted bearer token.
    Token,
    Bundle {
        #[clap(subcommand)]
        command: BundleCommand,
    },
    Certificate {
        #[clap(subcommand)]
        command: CertificateCommand,
    },
    Device {
        #[clap(subcommand)]
        command: DeviceCommand,
    },
    Profile {
        #[clap(subcommand)]
        command: ProfileCommand,
    },
    Build {
        #[clap(subcommand)]
        command: BuildCommand,
    },
    User {
        #[clap(subcommand)]
        command: UserCommand,
    },
    Report {
        #[clap(subcommand)]
        command: ReportCommand,
    },
}

impl Commands {
    pub async fn run(self, api_key: Option<&Path>) -> Result<()> {
        match self {
            Self::GenerateSigningCertificate { r#type, pem } => {
                let api = connect(api_key)?;
                certs_api::generate_signing_certificate(&api.provisioning, r#type, &pem).await?;
            }
            Self::CreateApiKey {
                issuer_id,
                key_id,
                private_key,
            } => {
                let path =
                    api_key.ok_or_else(|| anyhow!("--api-key is required to write the key"))?;
                UnifiedApiKey::from_ecdsa_pem_path(issuer_id, key_id, private_key)?
                    .write_json_file(path)?;
            }
            Self::Token => {
                let token = load_api_key(api_key)?
                    .token_encoder()?
                    .mint_async()
                    .await?;
                println!("{token}");
            }
            Self::Bundle { command } => command.run(&connect(api_key)?).await?,
            Self::Certificate { command } => command.run(&connect(api_key)?).await?,
            Self::Device { command } => command.run(&connect(api_key)?).await?,
            Self::Profile { command } => command.run(&connect(api_key)?).await?,
            Self::Build { command } => command.run(&connect(api_key)?).await?,
            Self::User { command } => command.run(&connect(api_key)?).await?,
            Self::Report { command } => command.run(&connect(api_key)?).await?,
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum BundleCommand {
    Register {
        /// Bundle identifier.
        #[clap(long)]
        identifier: String,
        /// Bundle name.
        #[clap(long)]
        name: String,
        /// Platform.
        #[clap(long, default_value = "universal")]
        platform: BundleIdPlatform,
    },
    List,
    Get {
        /// Id of bundle id.
        id: String,
    },
    Delete {
        /// Id of bundle id to delete.
        id: String,
    },
}

impl BundleCommand {
    pub async fn run(self, api: &AppStoreConnect) -> Result<()> {
        match self {
            Self::Register {
                identifier,
                name,
                platform,
            } => {
                let resp = api
                    .provisioning
                    .register_bundle_id(&identifier, &name, platform)
                    .await?;
                print_bundle_id_header();
                print_bundle_id(&resp.data);
            }
            Self::List => {
                let resp = api
                    .provisioning
                    .list_bundle_ids(&ListBundleIdsQuery::default())
                    .await?;
                print_bundle_id_header();
                for bundle_id in &resp.data {
                    print_bundle_id(bundle_id);
                }
            }
            Self::Get { id } => {
                let resp = api
                    .provisioning
                    .get_bundle_id(&id, &ReadBundleIdQuery::default())
                    .await?;
                print_bundle_id_header();
                print_bundle_id(&resp.data);
            }
            Self::Delete { id } => {
                api.provisioning.delete_bundle_id(&id).await?;
            }
        }
        Ok(())
    }
}

fn print_bundle_id_header() {
    println!("{: <10} | {: <20} | {: <30}", "id", "name", "identifier");
}

fn print_bundle_id(bundle_id: &Resource<BundleIdAttributes>) {
    let attributes = bundle_id.attributes.clone().unwrap_or_default();
    println!(
        "{: <10} | {: <20} | {: <30}",
        bundle_id.id,
        attributes.name.unwrap_or_default(),
        attributes.identifier.unwrap_or_default(),
    );
}

#[derive(Subcommand)]
pub enum CertificateCommand {
    Create {
        /// Certificate type, e.g. development, distribution or developer-id-application.
        #[clap(long)]
        r#type: CertificateType,
        /// Path to certificate signing request.
        csr: PathBuf,
    },
    List,
    Get {
        /// Id of certificate.
        id: String,
    },
    Revoke {
        /// Id of certificate to revoke.
        id: String,
    },
}

impl CertificateCommand {
    pub async fn run(self, api: &AppStoreConnect) -> Result<()> {
        match self {
            Self::Create { csr, r#type } => {
                let csr = std::fs::read_to_string(csr)?;
                let resp = api.provisioning.create_certificate(csr, r#type).await?;
                print_certificate_header();
                print_certificate(&resp.data);
            }
            Self::List => {
                let resp = api
                    .provisioning
                    .list_certificates(&ListCertificatesQuery::default())
                    .await?;
                print_certificate_header();
                for cert in &resp.data {
                    print_certificate(cert);
                }
            }
            Self::Get { id } => {
                let resp = api
                    .provisioning
                    .get_certificate(&id, &ReadCertificateQuery::default())
                    .await?;
                println!("{}", certificate_pem(&resp)?);
            }
            Self::Revoke { id } => {
                api.provisioning.revoke_certificate(&id).await?;
            }
        }
        Ok(())
    }
}

fn print_certificate_header() {
    println!(
        "{: <10} | {: <50} | {: <20}",
        "id", "name", "expiration date"
    );
}

fn print_certificate(cert: &Resource<CertificateAttributes>) {
    let attributes = cert.attributes.clone().unwrap_or_default();
    println!(
        "{: <10} | {: <50} | {: <10}",
        cert.id,
        attributes.name.unwrap_or_default(),
        format_date(attributes.expiration_date),
    );
}

/// Date part of a timestamp, or an empty string.
fn format_date(date: Option<DateTime<FixedOffset>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[derive(Subcommand)]
pub enum DeviceCommand {
    Register {
        /// Name for device.
        #[clap(long)]
        name: String,
        /// Platform.
        #[clap(long)]
        platform: BundleIdPlatform,
        /// Unique Device Identifier
        #[clap(long)]
        udid: String,
    },
    List,
    Get {
        /// Id of device.
        id: String,
    },
}

impl DeviceCommand {
    pub async fn run(self, api: &AppStoreConnect) -> Result<()> {
        match self {
            Self::Register {
                name,
                platform,
                udid,
            } => {
                let resp = api
                    .provisioning
                    .register_device(&name, platform, &udid)
                    .await?;
                print_device_header();
                print_device(&resp.data);
            }
            Self::List => {
                let resp = api
                    .provisioning
                    .list_devices(&ListDevicesQuery::default())
                    .await?;
                print_device_header();
                for device in &resp.data {
                    print_device(device);
                }
            }
            Self::Get { id } => {
                let resp = api
                    .provisioning
                    .get_device(&id, &DeviceFields::default())
                    .await?;
                print_device_header();
                print_device(&resp.data);
            }
        }
        Ok(())
    }
}

fn print_device_header() {
    println!(
        "{: <10} | {: <20} | {: <20} | {: <20}",
        "id", "name", "model", "udid"
    );
}

fn print_device(device: &Resource<DeviceAttributes>) {
    let attributes = device.attributes.clone().unwrap_or_default();
    println!(
        "{: <10} | {: <20} | {: <20} | {: <20}",
        device.id,
        attributes.name.unwrap_or_default(),
        attributes.model.unwrap_or_default(),
        attributes.udid.unwrap_or_default(),
    );
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Create {
        /// Name for profile.
        #[clap(long)]
        name: String,
        /// Profile type.
        #[clap(long)]
        profile_type: ProfileType,
        /// Bundle identifier id.
        #[clap(long)]
        bundle_id: String,
        /// Certificate ids.
        #[clap(long)]
        certificate: Vec<String>,
        /// Device ids.
        #[clap(long)]
        device: Option<Vec<String>>,
    },
    List,
    Get {
        /// Id of profile.
        id: String,
    },
    Delete {
        /// Id of profile.
        id: String,
    },
}

impl ProfileCommand {
    pub async fn run(self, api: &AppStoreConnect) -> Result<()> {
        match self {
            Self::Create {
                name,
                profile_type,
                bundle_id,
                certificate,
                device,
            } => {
                let resp = api
                    .provisioning
                    .create_profile(
                        &name,
                        profile_type,
                        &bundle_id,
                        &certificate,
                        device.as_deref(),
                    )
                    .await?;
                print_profile_header();
                print_profile(&resp.data);
            }
            Self::List => {
                let resp = api
                    .provisioning
                    .list_profiles(&ListProfilesQuery::default())
                    .await?;
                print_profile_header();
                for profile in &resp.data {
                    print_profile(profile);
                }
            }
            Self::Get { id } => {
                let resp = api
                    .provisioning
                    .get_profile(&id, &ReadProfileQuery::default())
                    .await?;
                let content = resp
                    .data
                    .attributes
                    .and_then(|a| a.profile_content)
                    .ok_or_else(|| anyhow!("profile {id} has no content"))?;
                std::io::stdout().write_all(&STANDARD_ENGINE.decode(content)?)?;
            }
            Self::Delete { id } => {
                api.provisioning.delete_profile(&id).await?;
            }
        }
        Ok(())
    }
}

fn print_profile_header() {
    println!(
        "{: <10} | {: <20} | {: <20} | {: <20}",
        "id", "name", "type", "expiration date"
    );
}

fn print_profile(profile: &Resource<ProfileAttributes>) {
    let attributes = profile.attributes.clone().unwrap_or_default();
    println!(
        "{: <10} | {: <20} | {: <20} | {: <20}",
        profile.id,
        attributes.name.unwrap_or_default(),
        attributes.profile_type.unwrap_or_default(),
        format_date(attributes.expiration_date),
    );
}

#[derive(Subcommand)]
pub enum BuildCommand {
    List {
        /// Only builds of this app id.
        #[clap(long)]
        app: Option<String>,
        /// Maximum number of builds to list.
        #[clap(long)]
        limit: Option<u32>,
    },
}

impl BuildCommand {
    pub async fn run(self, api: &AppStoreConnect) -> Result<()> {
        match self {
            Self::List { app, limit } => {
                let query = ListBuildsQuery {
                    filter: BuildFilter {
                        app: app.into_iter().collect(),
                        ..Default::default()
                    },
                    limit,
                    sort: vec!["-uploadedDate".into()],
                    ..Default::default()
                };
                let resp = api.testflight.list_builds(&query).await?;
                println!(
                    "{: <36} | {: <10} | {: <12} | {: <20}",
                    "id", "version", "state", "uploaded date"
                );
                for build in &resp.data {
                    print_build(build);
                }
            }
        }
        Ok(())
    }
}

fn print_build(build: &Resource<BuildAttributes>) {
    let attributes = build.attributes.clone().unwrap_or_default();
    let state = attributes
        .processing_state
        .map(|s| format!("{s:?}"))
        .unwrap_or_default();
    println!(
        "{: <36} | {: <10} | {: <12} | {: <20}",
        build.id,
        attributes.version.unwrap_or_default(),
        state,
        format_date(attributes.uploaded_date),
    );
}

#[derive(Subcommand)]
pub enum UserCommand {
    List,
}

impl UserCommand {
    pub async fn run(self, api: &AppStoreConnect) -> Result<()> {
        match self {
            Self::List => {
                let resp = api.users.list_users(&ListUsersQuery::default()).await?;
                println!("{: <36} | {: <30} | {: <30}", "id", "username", "roles");
                for user in &resp.data {
                    print_user(user);
                }
            }
        }
        Ok(())
    }
}

fn print_user(user: &Resource<UserAttributes>) {
    let attributes = user.attributes.clone().unwrap_or_default();
    let roles = attributes
        .roles
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(",");
    println!(
        "{: <36} | {: <30} | {: <30}",
        user.id,
        attributes.username.unwrap_or_default(),
        roles,
    );
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Downloads a gzip compressed sales report.
    Sales {
        #[clap(long)]
        vendor_number: String,
        #[clap(long, default_value = "daily")]
        frequency: SalesReportFrequency,
        #[clap(long, default_value = "sales")]
        report_type: SalesReportType,
        #[clap(long, default_value = "summary")]
        report_sub_type: SalesReportSubType,
        /// Report date. The most recent report when omitted.
        #[clap(long)]
        report_date: Option<String>,
        /// Report format version.
        #[clap(long)]
        version: Option<String>,
        /// Path to write the report to.
        output: PathBuf,
    },
    /// Downloads a gzip compressed finance report.
    Finance {
        #[clap(long)]
        vendor_number: String,
        #[clap(long, default_value = "ZZ")]
        region_code: String,
        /// Fiscal month, YYYY-MM.
        #[clap(long)]
        report_date: String,
        #[clap(long, default_value = "financial")]
        report_type: FinanceReportType,
        /// Path to write the report to.
        output: PathBuf,
    },
}

impl ReportCommand {
    pub async fn run(self, api: &AppStoreConnect) -> Result<()> {
        let (data, output) = match self {
            Self::Sales {
                vendor_number,
                frequency,
                report_type,
                report_sub_type,
                report_date,
                version,
                output,
            } => {
                let query = SalesReportsQuery {
                    filter: SalesReportFilter {
                        frequency,
                        report_date,
                        report_sub_type,
                        report_type,
                        vendor_number,
                        version,
                    },
                };
                (api.reports.download_sales_reports(&query).await?, output)
            }
            Self::Finance {
                vendor_number,
                region_code,
                report_date,
                report_type,
                output,
            } => {
                let query = FinanceReportsQuery {
                    filter: FinanceReportFilter {
                        region_code,
                        report_date,
                        report_type,
                        vendor_number,
                    },
                };
                (api.reports.download_finance_reports(&query).await?, output)
            }
        };

        std::fs::write(&output, &data)?;
        log::info!("wrote {} bytes to {}", data.len(), output.display());

        Ok(())
    }
}
