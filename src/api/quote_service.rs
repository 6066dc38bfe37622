// ==========================================
// 制造工站报价匹配系统 - 报价服务
// ==========================================
// 职责: 组装参考数据快照与管道, 暴露
//       解析 / 排序 / 报价 三段业务接口,
//       并负责审计记录与报价快照的持久化
// 红线: 持久化只在阶段成功完成后发生,
//       中途取消不会留下不一致的部分快照
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{CostParameters, HeuristicConfig};
use crate::domain::candidate::SimilarityMatch;
use crate::domain::quote::QuotationSnapshot;
use crate::domain::station::{ResolutionSummary, ResolvedStation};
use crate::engine::narrative::{generate_narrative_safe, NarrativeGenerator};
use crate::engine::pipeline::{QuotePipeline, SubmissionOptions};
use crate::engine::resolver::ReferenceSnapshot;
use crate::importer::UploadParser;
use crate::repository::{CandidateConfigRepository, SnapshotRepository, StationMasterRepository};
use crate::semantic::{CallPolicy, EmbeddingClient};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

// ==========================================
// 对外响应视图
// ==========================================

/// 解析阶段响应 (对外接口)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// 审计记录 ID
    pub audit_id: String,
    pub results: Vec<ResolvedStation>,
    pub summary: ResolutionSummary,
    pub warnings: Vec<String>,
}

/// 排序阶段的单条匹配视图 (相似度以 0-100 表述)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    pub config_id: String,
    pub customer_ref: String,
    /// 相似度分数 (0-100)
    pub score: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
    pub station_count: usize,
    pub total_manpower: f64,
    pub total_investment: f64,
    pub below_threshold: bool,
}

impl From<&SimilarityMatch> for MatchView {
    fn from(m: &SimilarityMatch) -> Self {
        Self {
            config_id: m.config_id.clone(),
            customer_ref: m.customer_ref.clone(),
            score: m.score_pct(),
            matched: m.matched.clone(),
            missing: m.missing.clone(),
            extra: m.extra.clone(),
            station_count: m.station_count,
            total_manpower: m.total_manpower,
            total_investment: m.total_investment,
            below_threshold: m.below_threshold,
        }
    }
}

/// 完整报价响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub audit_id: String,
    pub summary: ResolutionSummary,
    pub matches: Vec<MatchView>,
    /// 有可用匹配时生成并持久化
    pub quotation: Option<QuotationSnapshot>,
    /// 叙述说明 (生成失败时缺省, 不影响报价)
    pub narrative: Option<String>,
    pub warnings: Vec<String>,
}

// ==========================================
// QuoteService - 报价服务
// ==========================================
pub struct QuoteService {
    pipeline: QuotePipeline,
    snapshot_repo: Arc<SnapshotRepository>,
    narrative: Arc<dyn NarrativeGenerator>,
}

impl QuoteService {
    /// 初始化服务: 加载参考数据 → 构建语义索引 → 组装管道
    ///
    /// # 参数
    /// - `db_path`: 参考数据/快照库路径
    /// - `embedder`: 向量化能力实现
    /// - `narrative`: 叙述生成实现 (可为 NoOp)
    pub async fn initialize(
        db_path: &str,
        config: Arc<HeuristicConfig>,
        cost_params: Arc<CostParameters>,
        embedder: Arc<dyn EmbeddingClient>,
        narrative: Arc<dyn NarrativeGenerator>,
    ) -> ApiResult<Self> {
        let station_repo = StationMasterRepository::new(db_path)?;
        let candidate_repo = CandidateConfigRepository::new(db_path)?;
        let snapshot_repo = Arc::new(SnapshotRepository::new(db_path)?);

        let stations = station_repo.list_stations()?;
        let aliases = station_repo.list_aliases()?;
        let candidates = candidate_repo.list_configurations()?;

        if stations.is_empty() {
            return Err(ApiError::ReferenceUnavailable(
                "工站主数据为空, 请先导入参考数据".to_string(),
            ));
        }

        info!(
            stations = stations.len(),
            aliases = aliases.len(),
            candidates = candidates.len(),
            "参考数据加载完成"
        );

        let policy = CallPolicy {
            timeout_ms: config.external_timeout_ms,
            max_retries: config.external_max_retries,
            backoff_ms: config.retry_backoff_ms,
        };
        let snapshot =
            Arc::new(ReferenceSnapshot::build(stations, aliases, embedder.as_ref(), policy).await);

        if snapshot.index.is_empty() {
            info!("语义索引为空 (向量化服务不可用?), 解析将只有精确/别名两级");
        }

        let pipeline = QuotePipeline::new(config, cost_params, snapshot, candidates, embedder);

        Ok(Self {
            pipeline,
            snapshot_repo,
            narrative,
        })
    }

    // ==========================================
    // 解析接口
    // ==========================================

    /// 解析文本输入并持久化审计记录
    pub async fn resolve_text(
        &self,
        text: &str,
        options: &SubmissionOptions,
    ) -> ApiResult<ResolveResponse> {
        let outcome = self.pipeline.resolve_submission(text, options).await?;

        let audit_id = self.snapshot_repo.insert_resolution_audit(
            options.customer_scope.as_deref(),
            &outcome.results,
            &outcome.summary,
        )?;

        Ok(ResolveResponse {
            audit_id,
            results: outcome.results,
            summary: outcome.summary,
            warnings: outcome.warnings,
        })
    }

    /// 解析上传文件 (.csv/.xlsx/.xls/.txt)
    pub async fn resolve_file(
        &self,
        path: &Path,
        options: &SubmissionOptions,
    ) -> ApiResult<ResolveResponse> {
        let text = UploadParser::parse_file(path)?;
        self.resolve_text(&text, options).await
    }

    // ==========================================
    // 报价接口
    // ==========================================

    /// 全流程: 解析 → 排序 → 报价快照持久化
    pub async fn quote_text(
        &self,
        text: &str,
        options: &SubmissionOptions,
    ) -> ApiResult<QuoteResponse> {
        let run = self.pipeline.run_full(text, options).await?;

        let audit_id = self.snapshot_repo.insert_resolution_audit(
            options.customer_scope.as_deref(),
            &run.resolve.results,
            &run.resolve.summary,
        )?;

        let mut warnings = run.resolve.warnings.clone();
        warnings.extend(run.rank.warnings.clone());

        let mut narrative_text = None;
        if let Some(quotation) = &run.quotation {
            self.snapshot_repo.insert_quotation_snapshot(quotation)?;
            narrative_text = generate_narrative_safe(&self.narrative, quotation).await;
            info!(
                snapshot_id = %quotation.snapshot_id,
                disposition = %quotation.disposition,
                "报价快照已持久化"
            );
        }

        Ok(QuoteResponse {
            audit_id,
            summary: run.resolve.summary,
            matches: run.rank.matches.iter().map(MatchView::from).collect(),
            quotation: run.quotation,
            narrative: narrative_text,
            warnings,
        })
    }

    /// 全流程 (上传文件入口)
    pub async fn quote_file(
        &self,
        path: &Path,
        options: &SubmissionOptions,
    ) -> ApiResult<QuoteResponse> {
        let text = UploadParser::parse_file(path)?;
        self.quote_text(&text, options).await
    }

    /// 读取已持久化的报价快照
    pub fn get_quotation(&self, snapshot_id: &str) -> ApiResult<QuotationSnapshot> {
        Ok(self.snapshot_repo.get_quotation_snapshot(snapshot_id)?)
    }
}
