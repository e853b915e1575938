//! Domain health verifier: fetch DNS records for every requested kind,
//! classify them against expected values, and produce a verdict.

pub mod analysis;

use std::collections::BTreeMap;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::common::dns::{DnsError, DnsResolver};
use crate::common::domain::normalize;
use crate::records::{
    classify, RecordKind, RecordObservation, Selectors, VerificationRequest, VerificationResult,
};

use analysis::{build_analysis, AnalysisEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("DNS lookup for {kind} records failed: {source}")]
    Dns {
        kind: RecordKind,
        #[source]
        source: DnsError,
    },
}

/// Verifies a domain's DNS records against expected configuration.
///
/// Holds no state between calls: each `verify_records` invocation queries
/// fresh and returns an independent result.
pub struct DomainVerifier<R: DnsResolver> {
    resolver: R,
}

impl<R: DnsResolver> DomainVerifier<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Fetch and classify every record kind in the request.
    ///
    /// Lookups for independent kinds run concurrently and are joined before
    /// classification. A "no data" resolver outcome (NXDOMAIN or empty
    /// answer) becomes `RecordStatus::NotFound`; any other resolver error
    /// aborts the call with the failing kind attached.
    #[instrument(skip(self, request), fields(domain = %request.domain))]
    pub async fn verify_records(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResult, VerifyError> {
        let domain = normalize(&request.domain);
        if domain.is_empty() {
            return Err(VerifyError::EmptyDomain);
        }
        debug!(kinds = request.expected.len(), "verifying domain records");

        let lookups = request.expected.iter().map(|(kind, expected)| {
            let domain = domain.clone();
            let selectors = request.selectors.clone();
            async move {
                let observation = self.observe(*kind, &domain, &selectors).await?;
                let status = classify(expected, &observation);
                Ok::<_, VerifyError>((*kind, status, observation))
            }
        });

        let mut statuses = BTreeMap::new();
        let mut entries = Vec::new();
        for outcome in join_all(lookups).await {
            let (kind, status, observation) = outcome?;
            statuses.insert(kind, status);
            let expected = request.expected[&kind].clone();
            entries.push(AnalysisEntry {
                kind,
                status,
                expected,
                query_name: kind.query_name(&domain, &request.selectors),
                raw_values: observation.raw_values,
            });
        }

        let analysis = build_analysis(&domain, &entries);
        Ok(VerificationResult { statuses, analysis })
    }

    /// Fetch the record set applicable to one kind.
    async fn observe(
        &self,
        kind: RecordKind,
        domain: &str,
        selectors: &Selectors,
    ) -> Result<RecordObservation, VerifyError> {
        let name = kind.query_name(domain, selectors);
        let lookup = match kind {
            RecordKind::Mx => self.resolver.query_mx(&name).await.map(|records| {
                records
                    .into_iter()
                    .map(|(pref, exchange)| format!("{pref} {exchange}"))
                    .collect()
            }),
            _ => self.resolver.query_txt(&name).await,
        };

        match lookup {
            Ok(values) => Ok(RecordObservation::new(kind, values)),
            Err(e) if e.is_no_data() => Ok(RecordObservation::not_found(kind)),
            Err(e) => {
                warn!(%kind, name = %name, error = %e, "DNS lookup failed");
                Err(VerifyError::Dns { kind, source: e })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::dns::MockResolver;
    use crate::records::RecordStatus;

    fn request(domain: &str, pairs: &[(RecordKind, &str)]) -> VerificationRequest {
        let expected = pairs
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect::<BTreeMap<_, _>>();
        VerificationRequest::new(domain, expected)
    }

    // Scenario from the BIMI onboarding flow: record published at
    // default._bimi.example.com with the expected prefix.
    #[tokio::test]
    async fn bimi_record_verified() {
        let resolver = MockResolver::new();
        resolver.add_txt(
            "default._bimi.example.com",
            vec!["v=BIMI1; l=https://example.com/logo.svg".to_string()],
        );
        let verifier = DomainVerifier::new(resolver);

        let result = verifier
            .verify_records(&request("example.com", &[(RecordKind::Bimi, "v=BIMI1;")]))
            .await
            .unwrap();
        assert_eq!(result.statuses[&RecordKind::Bimi], RecordStatus::Verified);
    }

    #[tokio::test]
    async fn bimi_no_data_is_not_found() {
        let resolver = MockResolver::new();
        resolver.add_err("default._bimi.example.com", DnsError::NoRecords);
        let verifier = DomainVerifier::new(resolver);

        let result = verifier
            .verify_records(&request("example.com", &[(RecordKind::Bimi, "v=BIMI1;")]))
            .await
            .unwrap();
        assert_eq!(result.statuses[&RecordKind::Bimi], RecordStatus::NotFound);
    }

    #[tokio::test]
    async fn nxdomain_is_not_found() {
        let resolver = MockResolver::new();
        resolver.add_err("_dmarc.example.com", DnsError::NxDomain);
        let verifier = DomainVerifier::new(resolver);

        let result = verifier
            .verify_records(&request(
                "example.com",
                &[(RecordKind::Dmarc, "v=DMARC1;")],
            ))
            .await
            .unwrap();
        assert_eq!(result.statuses[&RecordKind::Dmarc], RecordStatus::NotFound);
    }

    #[tokio::test]
    async fn empty_answer_is_not_found() {
        let resolver = MockResolver::new();
        resolver.add_txt("example.com", vec![]);
        let verifier = DomainVerifier::new(resolver);

        let result = verifier
            .verify_records(&request("example.com", &[(RecordKind::Spf, "v=spf1")]))
            .await
            .unwrap();
        assert_eq!(result.statuses[&RecordKind::Spf], RecordStatus::NotFound);
    }

    #[tokio::test]
    async fn servfail_is_a_hard_failure() {
        let resolver = MockResolver::new();
        resolver.add_err("example.com", DnsError::ServFail);
        let verifier = DomainVerifier::new(resolver);

        let err = verifier
            .verify_records(&request("example.com", &[(RecordKind::Spf, "v=spf1")]))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            VerifyError::Dns {
                kind: RecordKind::Spf,
                source: DnsError::ServFail,
            }
        );
    }

    #[tokio::test]
    async fn records_exist_but_none_match() {
        let resolver = MockResolver::new();
        resolver.add_txt(
            "example.com",
            vec![
                "google-site-verification=abc".to_string(),
                "v=spf1 include:other.example -all".to_string(),
            ],
        );
        let verifier = DomainVerifier::new(resolver);

        let result = verifier
            .verify_records(&request(
                "example.com",
                &[(RecordKind::Ownership, "esp-verification=tok123")],
            ))
            .await
            .unwrap();
        assert_eq!(
            result.statuses[&RecordKind::Ownership],
            RecordStatus::Unverified
        );
    }

    #[tokio::test]
    async fn mx_match_on_exchange() {
        let resolver = MockResolver::new();
        resolver.add_mx(
            "example.com",
            vec![
                (20, "backup-mx.example.net".to_string()),
                (10, "feedback-smtp.us-east-1.example.net".to_string()),
            ],
        );
        let verifier = DomainVerifier::new(resolver);

        let result = verifier
            .verify_records(&request(
                "example.com",
                &[(RecordKind::Mx, "feedback-smtp.us-east-1.example.net")],
            ))
            .await
            .unwrap();
        assert_eq!(result.statuses[&RecordKind::Mx], RecordStatus::Verified);
    }

    #[tokio::test]
    async fn multiple_kinds_fetched_and_joined() {
        let resolver = MockResolver::new();
        resolver.add_txt("example.com", vec!["v=spf1 include:spf.esp.example -all".to_string()]);
        resolver.add_txt(
            "_dmarc.example.com",
            vec!["v=DMARC1; p=quarantine".to_string()],
        );
        resolver.add_mx("example.com", vec![(10, "mx.esp.example".to_string())]);
        // DKIM name unseeded: no records.
        let verifier = DomainVerifier::new(resolver);

        let result = verifier
            .verify_records(&request(
                "example.com",
                &[
                    (RecordKind::Spf, "include:spf.esp.example"),
                    (RecordKind::Dmarc, "v=DMARC1"),
                    (RecordKind::Mx, "mx.esp.example"),
                    (RecordKind::Dkim, "v=DKIM1"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(result.statuses[&RecordKind::Spf], RecordStatus::Verified);
        assert_eq!(result.statuses[&RecordKind::Dmarc], RecordStatus::Verified);
        assert_eq!(result.statuses[&RecordKind::Mx], RecordStatus::Verified);
        assert_eq!(result.statuses[&RecordKind::Dkim], RecordStatus::NotFound);
        assert_eq!(result.statuses.len(), 4);
    }

    #[tokio::test]
    async fn verify_is_idempotent_under_identical_dns_state() {
        let resolver = MockResolver::new();
        resolver.add_txt(
            "default._bimi.example.com",
            vec!["v=BIMI1; l=https://example.com/logo.svg".to_string()],
        );
        resolver.add_txt("example.com", vec!["unrelated".to_string()]);
        let verifier = DomainVerifier::new(resolver);

        let req = request(
            "example.com",
            &[(RecordKind::Bimi, "v=BIMI1;"), (RecordKind::Spf, "v=spf1")],
        );
        let first = verifier.verify_records(&req).await.unwrap();
        let second = verifier.verify_records(&req).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn domain_is_normalized_before_lookup() {
        let resolver = MockResolver::new();
        resolver.add_txt(
            "_dmarc.example.com",
            vec!["v=DMARC1; p=reject".to_string()],
        );
        let verifier = DomainVerifier::new(resolver);

        let result = verifier
            .verify_records(&request("Example.COM.", &[(RecordKind::Dmarc, "v=DMARC1")]))
            .await
            .unwrap();
        assert_eq!(result.statuses[&RecordKind::Dmarc], RecordStatus::Verified);
    }

    #[tokio::test]
    async fn empty_domain_rejected() {
        let verifier = DomainVerifier::new(MockResolver::new());
        let err = verifier
            .verify_records(&request("  ", &[(RecordKind::Spf, "v=spf1")]))
            .await
            .unwrap_err();
        assert_eq!(err, VerifyError::EmptyDomain);
    }

    #[tokio::test]
    async fn custom_selectors_change_query_names() {
        let resolver = MockResolver::new();
        resolver.add_txt(
            "esp2024._domainkey.example.com",
            vec!["v=DKIM1; k=rsa; p=MIGf...".to_string()],
        );
        let verifier = DomainVerifier::new(resolver);

        let req = request("example.com", &[(RecordKind::Dkim, "v=DKIM1")]).with_selectors(
            Selectors {
                dkim: "esp2024".to_string(),
                bimi: "default".to_string(),
            },
        );
        let result = verifier.verify_records(&req).await.unwrap();
        assert_eq!(result.statuses[&RecordKind::Dkim], RecordStatus::Verified);
    }
}
