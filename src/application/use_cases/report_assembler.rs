use crate::domain::chart::ChartArtifact;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::report::{Narrative, NarrativeDocument};
use crate::domain::statistics::StatisticsBundle;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_llm_response;
use crate::infrastructure::storage;
use crate::shared::token_counter::TokenCounter;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Written in place of the narrative when the service cannot be reached.
pub const NARRATIVE_FAILURE_NOTICE: &str = "Narrative generation failed due to an error.";

pub const DEFAULT_MAX_PROMPT_TOKENS: usize = 6000;

const SYSTEM_PROMPT: &str = "You are a data analyst writing for a non-technical audience. Describe the dataset, the key patterns in its summary statistics, missing values and correlations, and what the findings imply. Refer to the listed charts where they support a point. Answer in Markdown using level-2 headings or lower. Do not include the charts yourself.";

pub struct ReportAssembler {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
    max_prompt_tokens: usize,
}

impl ReportAssembler {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, config: LLMConfig) -> Self {
        Self {
            llm_client,
            config,
            max_prompt_tokens: DEFAULT_MAX_PROMPT_TOKENS,
        }
    }

    pub fn with_max_prompt_tokens(mut self, max_prompt_tokens: usize) -> Self {
        self.max_prompt_tokens = max_prompt_tokens;
        self
    }

    /// User prompt: the statistics as JSON plus the names of the produced charts.
    pub fn build_prompt(
        &self,
        base_name: &str,
        statistics: &StatisticsBundle,
        artifacts: &[ChartArtifact],
    ) -> Result<String> {
        let stats_json = statistics.to_json().map_err(|e| {
            AppError::NarrativeError(format!("Failed to serialize statistics: {}", e))
        })?;

        let mut charts = String::new();
        if artifacts.is_empty() {
            charts.push_str("- (no charts were produced)\n");
        }
        for artifact in artifacts {
            let _ = writeln!(charts, "- {} ({})", artifact.file_name, artifact.title);
        }

        // Reserve room for the framing text around the statistics
        let framing = 200 + TokenCounter::estimate_tokens(&charts);
        let stats_budget = self.max_prompt_tokens.saturating_sub(framing).max(1);
        let stats_json = TokenCounter::truncate_to_tokens(&stats_json, stats_budget);

        Ok(format!(
            "Provide a detailed analysis of the dataset '{}' based on the following data summary.\n\n\
             Data summary (JSON):\n{}\n\nCharts:\n{}",
            base_name, stats_json, charts
        ))
    }

    /// Ask the service for the narrative, falling back to the failure notice.
    pub async fn narrate(
        &self,
        base_name: &str,
        statistics: &StatisticsBundle,
        artifacts: &[ChartArtifact],
    ) -> Narrative {
        match self.request_narrative(base_name, statistics, artifacts).await {
            Ok(text) => Narrative::generated(text),
            Err(e) => {
                warn!("Narrative generation failed: {}", e);
                Narrative::failure_notice(NARRATIVE_FAILURE_NOTICE)
            }
        }
    }

    async fn request_narrative(
        &self,
        base_name: &str,
        statistics: &StatisticsBundle,
        artifacts: &[ChartArtifact],
    ) -> Result<String> {
        let user_prompt = self.build_prompt(base_name, statistics, artifacts)?;
        let estimated = TokenCounter::estimate_messages_tokens(&[
            ("system", SYSTEM_PROMPT),
            ("user", user_prompt.as_str()),
        ]);
        info!(
            "Requesting narrative from {} (~{} prompt tokens)",
            self.config.model, estimated
        );

        let raw = self
            .llm_client
            .generate(&self.config, SYSTEM_PROMPT, &user_prompt)
            .await?;

        let text = clean_llm_response(&raw);
        if text.is_empty() {
            return Err(AppError::NarrativeError("Empty narrative returned".to_string()));
        }
        Ok(text)
    }

    /// Lay out the README: title, overview, narrative, one section per chart.
    pub fn render_document(
        base_name: &str,
        statistics: &StatisticsBundle,
        narrative: &Narrative,
        artifacts: &[ChartArtifact],
    ) -> String {
        let mut doc = String::new();
        let _ = writeln!(doc, "# Automated Analysis of {}\n", base_name);
        let _ = writeln!(
            doc,
            "The dataset contains {} rows and {} columns.\n",
            statistics.row_count, statistics.column_count
        );
        let _ = writeln!(doc, "{}\n", narrative.text.trim());

        if !artifacts.is_empty() {
            doc.push_str("## Visualizations\n");
            for artifact in artifacts {
                let _ = write!(
                    doc,
                    "\n### {}\n\n![{}]({})\n",
                    artifact.title, artifact.title, artifact.file_name
                );
            }
        }

        doc
    }

    /// Produce the narrative and write `{base}_README.md` into `output_dir`.
    pub async fn assemble(
        &self,
        base_name: &str,
        statistics: &StatisticsBundle,
        artifacts: &[ChartArtifact],
        output_dir: &Path,
    ) -> Result<NarrativeDocument> {
        let narrative = self.narrate(base_name, statistics, artifacts).await;
        let content = Self::render_document(base_name, statistics, &narrative, artifacts);

        let path = storage::readme_path(output_dir, base_name);
        storage::write_text(&path, &content)?;
        info!("Wrote {}", path.display());

        Ok(NarrativeDocument {
            path,
            content,
            source: narrative.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::summarizer::Summarizer;
    use crate::domain::chart::{ChartKind, ChartPlan};
    use crate::domain::report::NarrativeSource;
    use crate::infrastructure::csv::CsvParser;
    use async_trait::async_trait;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct StubClient {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubClient {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LLMClient for StubClient {
        async fn generate(&self, _config: &LLMConfig, _system: &str, user: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(user.to_string());
            self.reply
                .clone()
                .ok_or_else(|| AppError::NarrativeError("service unavailable".to_string()))
        }
    }

    fn statistics() -> StatisticsBundle {
        let table = CsvParser::new()
            .parse_content("age,city\n30,Paris\n40,Rome\n,Paris\n")
            .unwrap();
        Summarizer::new().summarize(&table)
    }

    fn artifact(kind: ChartKind, column: &str) -> ChartArtifact {
        let plan = ChartPlan::new(kind, vec![column.to_string()]);
        let file_name = plan.file_name("people");
        ChartArtifact {
            kind,
            columns: plan.columns.clone(),
            title: plan.title(),
            path: PathBuf::from("out").join(&file_name),
            file_name,
        }
    }

    fn temp_output() -> PathBuf {
        std::env::temp_dir().join(format!("autolysis_report_{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_prompt_contains_statistics_and_charts() {
        let assembler = ReportAssembler::new(StubClient::failing(), LLMConfig::default());
        let artifacts = vec![artifact(ChartKind::Distribution, "age")];

        let prompt = assembler
            .build_prompt("people", &statistics(), &artifacts)
            .unwrap();

        assert!(prompt.contains("'people'"));
        assert!(prompt.contains("\"row_count\": 3"));
        assert!(prompt.contains("people_age_distribution.png"));
    }

    #[test]
    fn test_prompt_truncated_to_budget() {
        let assembler = ReportAssembler::new(StubClient::failing(), LLMConfig::default())
            .with_max_prompt_tokens(220);

        let prompt = assembler.build_prompt("people", &statistics(), &[]).unwrap();
        assert!(prompt.contains("[truncated]"));
        assert!(prompt.contains("no charts were produced"));
    }

    #[test]
    fn test_render_document_layout() {
        let artifacts = vec![
            artifact(ChartKind::Distribution, "age"),
            artifact(ChartKind::CategoryBar, "city"),
        ];
        let narrative = Narrative::generated("People live in two cities.".to_string());

        let doc = ReportAssembler::render_document("people", &statistics(), &narrative, &artifacts);

        assert!(doc.starts_with("# Automated Analysis of people\n"));
        assert!(doc.contains("3 rows and 2 columns"));
        assert!(doc.contains("People live in two cities."));
        assert_eq!(doc.matches("\n### ").count(), 2);
        assert!(doc.contains("![Distribution of age](people_age_distribution.png)"));
        assert!(doc.contains("![Top values of city](people_city_bar.png)"));
    }

    #[test]
    fn test_render_document_without_charts() {
        let narrative = Narrative::failure_notice(NARRATIVE_FAILURE_NOTICE);
        let doc = ReportAssembler::render_document("people", &statistics(), &narrative, &[]);

        assert!(!doc.contains("## Visualizations"));
        assert!(doc.contains(NARRATIVE_FAILURE_NOTICE));
    }

    #[tokio::test]
    async fn test_assemble_writes_generated_narrative() {
        let client = StubClient::replying("```markdown\n## Findings\n\nAges vary.\n```");
        let assembler = ReportAssembler::new(client.clone(), LLMConfig::default());
        let output = temp_output();
        fs::create_dir_all(&output).unwrap();

        let artifacts = vec![artifact(ChartKind::Distribution, "age")];
        let doc = assembler
            .assemble("people", &statistics(), &artifacts, &output)
            .await
            .unwrap();

        assert_eq!(doc.source, NarrativeSource::Generated);
        assert_eq!(doc.path, output.join("people_README.md"));
        let written = fs::read_to_string(&doc.path).unwrap();
        assert_eq!(written, doc.content);
        assert!(written.contains("## Findings\n\nAges vary."));
        assert!(!written.contains("```"));
        assert_eq!(client.prompts.lock().unwrap().len(), 1);

        fs::remove_dir_all(&output).unwrap();
    }

    #[tokio::test]
    async fn test_assemble_falls_back_on_failure() {
        let client = StubClient::failing();
        let assembler = ReportAssembler::new(client.clone(), LLMConfig::default());
        let output = temp_output();
        fs::create_dir_all(&output).unwrap();

        let doc = assembler
            .assemble("people", &statistics(), &[], &output)
            .await
            .unwrap();

        assert_eq!(doc.source, NarrativeSource::FailureNotice);
        let written = fs::read_to_string(&doc.path).unwrap();
        assert!(written.contains(NARRATIVE_FAILURE_NOTICE));
        // Exactly one attempt, no retries
        assert_eq!(client.prompts.lock().unwrap().len(), 1);

        fs::remove_dir_all(&output).unwrap();
    }

    #[tokio::test]
    async fn test_blank_reply_counts_as_failure() {
        let assembler = ReportAssembler::new(StubClient::replying("  \n "), LLMConfig::default());
        let narrative = assembler.narrate("people", &statistics(), &[]).await;

        assert!(!narrative.is_generated());
        assert_eq!(narrative.text, NARRATIVE_FAILURE_NOTICE);
    }
}
