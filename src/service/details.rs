//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! Describes which annotation types a service can produce.
//!
//! Hosted services are looked up in the public service catalogue, which lists
//! recommended column definitions per service. Any other endpoint is asked for
//! its metadata and the advertised annotation types are listed instead.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::service::client::ZiCloudClient;

pub const HOSTED_ENDPOINT_PREFIX: &str = "https://cloud-api.gate.ac.uk";
pub const SERVICE_CATALOGUE_URL: &str =
    "https://github.com/GateNLP/gate-metadata/raw/refs/heads/master/sheets-services/services-1.0.0.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiServiceConfigs {
    #[serde(default)]
    pub standard: Vec<String>,
    #[serde(default)]
    pub extra: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiServiceCatalogueEntry {
    pub slug: String,
    #[serde(default)]
    pub configs: ZiServiceConfigs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZiServiceDetails {
    /// Recommended column definitions from the catalogue.
    Recommended {
        slug: String,
        standard: Vec<String>,
        extra: Option<Vec<String>>,
    },
    /// Annotation types listed in the service metadata.
    AnnotationTypes { endpoint: String, types: BTreeSet<String> },
}

impl fmt::Display for ZiServiceDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZiServiceDetails::Recommended { slug, standard, extra } => {
                writeln!(f, "Service {} has the following recommended result specifiers:", slug)?;
                writeln!(f)?;
                for column in standard {
                    writeln!(f, "    {}", column)?;
                }
                if let Some(extra) = extra {
                    writeln!(f)?;
                    writeln!(f, "and the following additional examples:")?;
                    writeln!(f)?;
                    for column in extra {
                        writeln!(f, "    {}", column)?;
                    }
                }
                Ok(())
            }
            ZiServiceDetails::AnnotationTypes { endpoint, types } => {
                writeln!(f, "Service {} can return the following annotation types:", endpoint)?;
                writeln!(f)?;
                for annotation_type in types {
                    writeln!(f, "    {}", annotation_type)?;
                }
                writeln!(f)?;
                writeln!(
                    f,
                    "For details on the features of each annotation, see the documentation or try the"
                )?;
                writeln!(f, "service yourself with some sample data.")
            }
        }
    }
}

pub fn is_hosted_endpoint(endpoint: &str) -> bool {
    endpoint.starts_with(HOSTED_ENDPOINT_PREFIX)
}

/// Last path segment of the endpoint URL.
pub fn endpoint_slug(endpoint: &str) -> &str {
    let trimmed = endpoint.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, slug)) => slug,
        None => trimmed,
    }
}

pub fn find_in_catalogue<'a>(
    catalogue: &'a [ZiServiceCatalogueEntry],
    slug: &str,
) -> Option<&'a ZiServiceCatalogueEntry> {
    catalogue.iter().find(|entry| entry.slug == slug)
}

/// Downloads the public service catalogue. No credentials are sent.
pub fn fetch_catalogue(timeout: Option<Duration>) -> Result<Vec<ZiServiceCatalogueEntry>> {
    let http = reqwest::blocking::Client::builder().timeout(timeout).build()?;
    let response = http.get(SERVICE_CATALOGUE_URL).send()?;
    if !response.status().is_success() {
        return Err(ZiError::Http(format!(
            "service catalogue returned status {}",
            response.status().as_u16()
        )));
    }
    Ok(serde_json::from_str(&response.text()?)?)
}

pub fn details_from_catalogue(
    catalogue: &[ZiServiceCatalogueEntry],
    endpoint: &str,
) -> Option<ZiServiceDetails> {
    let slug = endpoint_slug(endpoint);
    find_in_catalogue(catalogue, slug).map(|entry| ZiServiceDetails::Recommended {
        slug: slug.to_string(),
        standard: entry.configs.standard.clone(),
        extra: entry.configs.extra.clone(),
    })
}

/// Looks a hosted endpoint up in the catalogue, falling back to the
/// service's own metadata when it is not listed there.
pub fn describe_service(client: &ZiCloudClient) -> Result<ZiServiceDetails> {
    let endpoint = client.endpoint();
    if is_hosted_endpoint(endpoint) {
        let catalogue = fetch_catalogue(client.config().timeout)?;
        if let Some(details) = details_from_catalogue(&catalogue, endpoint) {
            return Ok(details);
        }
        log::info!("{} is not in the service catalogue, asking the service itself", endpoint);
    }

    let metadata = client.fetch_metadata()?;
    Ok(ZiServiceDetails::AnnotationTypes {
        endpoint: endpoint.to_string(),
        types: metadata.annotation_types(),
    })
}
