// Redirect resolution: static list first, live probe on a miss

use crate::aggregate::UrlUsageIndex;
use crate::redirects::KnownRedirectSet;
use guideaudit_scanner::{ProbeResult, Prober};
use serde::Serialize;
use tracing::info;

/// How a website URL is (or is not) covered by a redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// Listed in the known-redirect set; no request was made
    FoundStatic,
    /// A live request landed on a URL that is in the known-redirect set
    FoundViaLiveRedirect { alias: String, status_code: u16 },
    /// Not covered. `alias` is where the live request ended up, if elsewhere
    Missing {
        alias: Option<String>,
        status_code: u16,
    },
    /// The live request failed at the transport level
    ProbeFailed { error: String },
}

impl ResolutionOutcome {
    /// Missing and failed probes both end up in the report
    pub fn is_reportable(&self) -> bool {
        matches!(
            self,
            ResolutionOutcome::Missing { .. } | ResolutionOutcome::ProbeFailed { .. }
        )
    }

    pub fn was_probed(&self) -> bool {
        !matches!(self, ResolutionOutcome::FoundStatic)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ResolutionOutcome::FoundViaLiveRedirect { status_code, .. }
            | ResolutionOutcome::Missing { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub url: String,
    #[serde(flatten)]
    pub outcome: ResolutionOutcome,
}

/// Classify a live probe of `url` against the known-redirect set
pub fn classify_probe(probe: &ProbeResult, known: &KnownRedirectSet) -> ResolutionOutcome {
    if let Some(error) = &probe.error {
        return ResolutionOutcome::ProbeFailed {
            error: error.clone(),
        };
    }

    match probe.redirected_to() {
        Some(alias) if known.contains(alias) => {
            info!("Found live redirect {} - skipping", alias);
            ResolutionOutcome::FoundViaLiveRedirect {
                alias: alias.to_string(),
                status_code: probe.status_code,
            }
        }
        Some(alias) => {
            info!("{} live redirect also not found", alias);
            ResolutionOutcome::Missing {
                alias: Some(alias.to_string()),
                status_code: probe.status_code,
            }
        }
        None => ResolutionOutcome::Missing {
            alias: None,
            status_code: probe.status_code,
        },
    }
}

/// Resolve one URL, probing only when it is not in `known`
pub async fn resolve_url(url: &str, known: &KnownRedirectSet, prober: &Prober) -> Resolution {
    let outcome = if known.contains(url) {
        info!("Found {} - skipping", url);
        ResolutionOutcome::FoundStatic
    } else {
        info!("{} not found, checking live redirect...", url);
        let probe = prober.probe(url).await;
        classify_probe(&probe, known)
    };

    if outcome.is_reportable() {
        info!("Reporting {}", url);
    }

    Resolution {
        url: url.to_string(),
        outcome,
    }
}

/// Resolve every distinct URL of `index` once, in sorted order, sequentially
pub async fn resolve_all<F>(
    index: &UrlUsageIndex,
    known: &KnownRedirectSet,
    prober: &Prober,
    mut on_url: F,
) -> Vec<Resolution>
where
    F: FnMut(usize, usize, &str),
{
    info!("Checking redirects for {} website URL(s)...", index.len());

    let total = index.len();
    let mut resolutions = Vec::with_capacity(total);
    for (idx, url) in index.urls().enumerate() {
        on_url(idx + 1, total, url);
        resolutions.push(resolve_url(url, known, prober).await);
    }
    resolutions
}
