// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sales and finance report downloads.
//!
//! Reports are gzip compressed tab separated files. They are returned as the
//! raw bytes the server sent; decompressing them is up to the caller.

use {
    crate::{client::CallOptions, response::ContentType, Reports, Result},
    bytes::Bytes,
    reqwest::Method,
    serde::Serialize,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinanceReportType {
    Financial,
    FinanceDetail,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceReportFilter {
    /// Two letter region code, or `ZZ` for all regions.
    pub region_code: String,
    /// Fiscal month, `YYYY-MM`.
    pub report_date: String,
    pub report_type: FinanceReportType,
    pub vendor_number: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct FinanceReportsQuery {
    pub filter: FinanceReportFilter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesReportFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesReportType {
    Sales,
    PreOrder,
    Newsstand,
    Subscription,
    SubscriptionEvent,
    Subscriber,
    SubscriptionOfferCodeRedemption,
    InstallsNewsstand,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesReportSubType {
    Summary,
    Detailed,
    OptIn,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportFilter {
    pub frequency: SalesReportFrequency,
    /// `YYYY-MM-DD` for daily and weekly reports, `YYYY-MM` or `YYYY` otherwise.
    /// Omit for the most recent report.
    pub report_date: Option<String>,
    pub report_sub_type: SalesReportSubType,
    pub report_type: SalesReportType,
    pub vendor_number: String,
    /// Report format version, e.g. `1_0`.
    pub version: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SalesReportsQuery {
    pub filter: SalesReportFilter,
}

impl Reports {
    pub async fn download_finance_reports(&self, query: &FinanceReportsQuery) -> Result<Bytes> {
        self.download("/financeReports", query).await
    }

    pub async fn download_sales_reports(&self, query: &SalesReportsQuery) -> Result<Bytes> {
        self.download("/salesReports", query).await
    }

    async fn download<Q: Serialize>(&self, path: &str, query: &Q) -> Result<Bytes> {
        let options = CallOptions::new()
            .query(query)?
            .content_type(ContentType::Gzip);

        self.api.call(Method::GET, path, options).await?.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::query::serialize_query};

    #[test]
    fn sales_query() {
        let query = SalesReportsQuery {
            filter: SalesReportFilter {
                frequency: SalesReportFrequency::Daily,
                report_date: Some("2024-01-31".into()),
                report_sub_type: SalesReportSubType::Summary,
                report_type: SalesReportType::Sales,
                vendor_number: "8500000".into(),
                version: None,
            },
        };

        assert_eq!(
            serialize_query(&query).unwrap().as_deref(),
            Some(
                "filter[frequency]=DAILY&filter[reportDate]=2024-01-31\
                 &filter[reportSubType]=SUMMARY&filter[reportType]=SALES\
                 &filter[vendorNumber]=8500000"
            )
        );
    }

    #[test]
    fn finance_query() {
        let query = FinanceReportsQuery {
            filter: FinanceReportFilter {
                region_code: "ZZ".into(),
                report_date: "2023-12".into(),
                report_type: FinanceReportType::FinanceDetail,
                vendor_number: "8500000".into(),
            },
        };

        assert_eq!(
            serialize_query(&query).unwrap().as_deref(),
            Some(
                "filter[regionCode]=ZZ&filter[reportDate]=2023-12\
                 &filter[reportType]=FINANCE_DETAIL&filter[vendorNumber]=8500000"
            )
        );
    }
}
