//! Integration tests for the correction loop

#[cfg(test)]
mod tests {
    use crate::{ExtractionSession, ExtractorError, SessionConfig, SessionOutcome};
    use gantry_domain::{ImageData, ValidationOutcome};
    use gantry_oracle::ScriptedOracle;

    fn test_image() -> ImageData {
        ImageData::new("image/jpeg", "dGVzdA==")
    }

    fn config(max_iterations: u32) -> SessionConfig {
        SessionConfig {
            max_iterations,
            ..SessionConfig::default()
        }
    }

    // CSQU3054383 and MSKU1234565 carry correct check digits;
    // CMCU4557748 claims 8 where the computed digit is 6.
    const ROUND_ONE: &str = r#"[
        {"container_id": "CSQU3054383", "carrier": "COSCO"},
        {"container_id": "CMCU4557748", "carrier": "CROWLEY"},
        {"container_id": "MSKU1234565", "carrier": "MAERSK"}
    ]"#;

    const ROUND_TWO_FIXED: &str = r#"[
        {"container_id": "CSQU3054383", "carrier": "COSCO"},
        {"container_id": "CMCU4557746", "carrier": "CROWLEY"},
        {"container_id": "MSKU1234565", "carrier": "MAERSK"}
    ]"#;

    #[tokio::test]
    async fn test_single_invalid_id_is_corrected_and_converges() {
        let oracle = ScriptedOracle::new([ROUND_ONE, ROUND_TWO_FIXED]);
        let session = ExtractionSession::new(oracle.clone(), config(3));

        let report = session.run(test_image()).await.unwrap();

        assert_eq!(report.outcome, SessionOutcome::Converged { rounds: 2 });
        assert!(report.unresolved.is_empty());

        // Order preserved across the correction round
        let ids: Vec<&str> = report
            .records
            .iter()
            .map(|r| r.container_id.as_str())
            .collect();
        assert_eq!(ids, ["CSQU3054383", "CMCU4557746", "MSKU1234565"]);

        // Exactly one correction request, naming only the invalid ID
        assert_eq!(oracle.call_count(), 2);
        let correction = oracle.last_request().unwrap();
        assert_eq!(correction.len(), 3); // extraction, reply, correction
        let text = correction[2].text();
        assert!(text.contains("CMCU4557748"));
        assert!(!text.contains("CSQU3054383"));
        assert!(!text.contains("MSKU1234565"));
    }

    #[tokio::test]
    async fn test_parse_retries_do_not_consume_correction_rounds() {
        let oracle = ScriptedOracle::new([
            "The image shows three shipping containers.",
            "```\nstill not json\n```",
            r#"[{"container_id": "CSQU3054383"}]"#,
        ]);
        let session = ExtractionSession::new(oracle.clone(), config(3));

        let report = session.run(test_image()).await.unwrap();

        // Round 3's parse succeeded and converged without any
        // correction semantics
        assert_eq!(report.outcome, SessionOutcome::Converged { rounds: 1 });
        assert_eq!(report.metadata.parse_retries, 2);
        assert_eq!(oracle.call_count(), 3);
    }

    #[tokio::test]
    async fn test_total_parse_exhaustion_fails_the_session() {
        let oracle = ScriptedOracle::new(["not json", "still not json"]);
        let session = ExtractionSession::new(oracle, config(2));

        let result = session.run(test_image()).await;

        assert!(matches!(
            result,
            Err(ExtractorError::Convergence { attempts: 2 })
        ));
    }

    #[tokio::test]
    async fn test_exhaustion_returns_flagged_set_not_error() {
        // Correction never fixes the bad check digit
        let oracle = ScriptedOracle::new([ROUND_ONE, ROUND_ONE]);
        let session = ExtractionSession::new(oracle, config(2));

        let report = session.run(test_image()).await.unwrap();

        assert_eq!(report.outcome, SessionOutcome::Exhausted);
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved[0].identifier, "CMCU4557748");
        assert_eq!(report.unresolved[0].index, 1);
        assert_eq!(
            report.unresolved[0].outcome,
            ValidationOutcome::ChecksumMismatch
        );
    }

    #[tokio::test]
    async fn test_count_regression_warns_but_still_converges() {
        let dropped_but_valid = r#"[
            {"container_id": "CSQU3054383"},
            {"container_id": "MSKU1234565"}
        ]"#;
        let oracle = ScriptedOracle::new([ROUND_ONE, dropped_but_valid]);
        let session = ExtractionSession::new(oracle, config(3));

        let report = session.run(test_image()).await.unwrap();

        assert_eq!(report.outcome, SessionOutcome::Converged { rounds: 2 });
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("decreased from 3 to 2"));
    }

    #[tokio::test]
    async fn test_unknown_sentinel_never_blocks_convergence() {
        let oracle = ScriptedOracle::new([r#"[
            {"container_id": "CSQU3054383"},
            {"container_id": "unknown"},
            {"container_id": "UNKNOWN"}
        ]"#]);
        let session = ExtractionSession::new(oracle, config(3));

        let report = session.run(test_image()).await.unwrap();

        assert_eq!(report.outcome, SessionOutcome::Converged { rounds: 1 });
        assert!(report.unresolved.is_empty());
        // Sentinels are canonicalized, not normalized away
        assert_eq!(report.records.records()[1].container_id, "Unknown");
        assert_eq!(report.records.records()[2].container_id, "Unknown");
    }

    #[tokio::test]
    async fn test_transport_failure_mid_session_is_terminal() {
        let oracle = ScriptedOracle::new([ROUND_ONE]);
        oracle.push_failure("connection reset by peer");
        let session = ExtractionSession::new(oracle.clone(), config(3));

        // Round 1 parses with one invalid ID; the correction call dies
        let result = session.run(test_image()).await;

        assert!(matches!(result, Err(ExtractorError::Oracle(_))));
        assert_eq!(oracle.call_count(), 2);
    }

    #[tokio::test]
    async fn test_correction_request_carries_full_conversation() {
        let oracle = ScriptedOracle::new([ROUND_ONE, ROUND_TWO_FIXED]);
        let session = ExtractionSession::new(oracle.clone(), config(3));

        session.run(test_image()).await.unwrap();

        let correction = oracle.last_request().unwrap();
        // The oracle sees its own prior answer when asked to correct it
        assert_eq!(correction[0].role.as_str(), "user");
        assert_eq!(correction[1].role.as_str(), "assistant");
        assert!(correction[1].text().contains("CMCU4557748"));
        assert_eq!(correction[2].role.as_str(), "user");
    }

    #[tokio::test]
    async fn test_empty_set_converges_trivially() {
        let oracle = ScriptedOracle::new(["[]"]);
        let session = ExtractionSession::new(oracle, config(3));

        let report = session.run(test_image()).await.unwrap();

        assert_eq!(report.outcome, SessionOutcome::Converged { rounds: 1 });
        assert!(report.records.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let oracle = ScriptedOracle::new(["[]"]);
        let session = ExtractionSession::new(oracle, config(0));

        let result = session.run(test_image()).await;
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }
}
