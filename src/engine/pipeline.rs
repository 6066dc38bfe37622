// ==========================================
// 制造工站报价匹配系统 - 管道编排器
// ==========================================
// 职责: 串联 分类 → 解析 → 列角色 → 提取 → 解析
//       → 排序 → 成本估算 的顺序管道
// 红线: 每个阶段返回带警告的成功或带原因的失败,
//       不向宿主请求传播未处理异常
// 取消: 调用方放弃 future 即放弃在途外部查询,
//       部分结果不持久化 (持久化在 API 层完成后才发生)
// ==========================================

use crate::config::{CostParameters, HeuristicConfig};
use crate::domain::candidate::{CandidateConfiguration, SimilarityMatch};
use crate::domain::quote::QuotationSnapshot;
use crate::domain::station::{ExtractionReport, ResolutionSummary, ResolvedStation};
use crate::domain::table::{ColumnDetection, ParsedTable, RawInputBlock, StatusFilter};
use crate::domain::types::{ColumnRole, Disposition, InputShape, RiskLevel};
use crate::engine::classifier::InputClassifier;
use crate::engine::column_detector::ColumnRoleDetector;
use crate::engine::cost::CostEstimator;
use crate::engine::extractor::StationExtractor;
use crate::engine::resolver::{ReferenceSnapshot, StationResolver};
use crate::engine::risk::RiskEngine;
use crate::engine::similarity::SimilarityRanker;
use crate::engine::table_parser::TableParser;
use crate::semantic::EmbeddingClient;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// 错误类型
// ==========================================

/// 管道错误: 带原因的阶段失败
#[derive(Error, Debug)]
pub enum PipelineError {
    /// 空白或根本无法解析的输入, 在提取前中止
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 未检测到工站标识列 (整体置信度 0), 需人工列角色修正
    #[error("列角色不明确: {0}")]
    AmbiguousColumns(String),

    /// 参考数据不可用
    #[error("参考数据不可用: {0}")]
    ReferenceUnavailable(String),
}

// ==========================================
// 提交选项与结果
// ==========================================

/// 单次提交的处理选项
#[derive(Debug, Clone)]
pub struct SubmissionOptions {
    /// 客户范围标识 (别名查找优先使用)
    pub customer_scope: Option<String>,
    /// 调用方显式列角色覆盖 (列下标, 角色)
    pub column_overrides: Vec<(usize, ColumnRole)>,
    /// 状态过滤配置
    pub status_filter: StatusFilter,
    /// 是否捕获描述
    pub capture_description: bool,
    /// 目标月产量 (风险利用率计算)
    pub target_monthly_volume: Option<f64>,
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self {
            customer_scope: None,
            column_overrides: Vec::new(),
            status_filter: StatusFilter::disabled(),
            capture_description: true,
            target_monthly_volume: None,
        }
    }
}

/// 解析阶段输出的文档对象 (提及 + 解析警告)
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub block: RawInputBlock,
    /// 表格形态时存在
    pub table: Option<ParsedTable>,
    /// 表格形态时存在
    pub detection: Option<ColumnDetection>,
    pub extraction: ExtractionReport,
    pub warnings: Vec<String>,
}

/// 解析阶段结果
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    pub document: ParsedDocument,
    pub results: Vec<ResolvedStation>,
    pub summary: ResolutionSummary,
    pub warnings: Vec<String>,
}

/// 排序阶段结果
#[derive(Debug, Clone)]
pub struct RankOutcome {
    pub matches: Vec<SimilarityMatch>,
    pub warnings: Vec<String>,
}

/// 全流程运行结果
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub resolve: ResolveOutcome,
    pub rank: RankOutcome,
    /// 有可用匹配时生成
    pub quotation: Option<QuotationSnapshot>,
}

// ==========================================
// QuotePipeline - 管道编排器
// ==========================================
pub struct QuotePipeline {
    classifier: InputClassifier,
    table_parser: TableParser,
    column_detector: ColumnRoleDetector,
    extractor: StationExtractor,
    resolver: StationResolver,
    ranker: SimilarityRanker,
    cost_estimator: CostEstimator,
    risk_engine: RiskEngine,
    config: Arc<HeuristicConfig>,
    candidates: Vec<CandidateConfiguration>,
}

impl QuotePipeline {
    /// 构造管道
    ///
    /// # 参数
    /// - `config` / `cost_params`: 启动时注入的只读配置
    /// - `snapshot`: 本次检索的参考数据快照
    /// - `candidates`: 候选历史配置集合
    /// - `embedder`: 向量化能力 (测试注入确定性桩)
    pub fn new(
        config: Arc<HeuristicConfig>,
        cost_params: Arc<CostParameters>,
        snapshot: Arc<ReferenceSnapshot>,
        candidates: Vec<CandidateConfiguration>,
        embedder: Arc<dyn EmbeddingClient>,
    ) -> Self {
        Self {
            classifier: InputClassifier::new(Arc::clone(&config)),
            table_parser: TableParser::new(),
            column_detector: ColumnRoleDetector::new(Arc::clone(&config)),
            extractor: StationExtractor::new(Arc::clone(&config)),
            resolver: StationResolver::new(
                Arc::clone(&config),
                snapshot,
                embedder,
            ),
            ranker: SimilarityRanker::new(Arc::clone(&config)),
            cost_estimator: CostEstimator::new(Arc::clone(&cost_params)),
            risk_engine: RiskEngine::new(cost_params),
            config,
            candidates,
        }
    }

    // ==========================================
    // 解析阶段: 分类 → 解析 → 列角色 → 提取 → 工站解析
    // ==========================================

    #[instrument(skip_all, fields(len = text.len()))]
    pub async fn resolve_submission(
        &self,
        text: &str,
        options: &SubmissionOptions,
    ) -> Result<ResolveOutcome, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::InvalidInput("输入为空".to_string()));
        }

        // 阶段 1: 形态分类 (只判定一次)
        let block = self.classifier.classify(text);
        info!(shape = %block.shape, confidence = block.confidence, "输入形态判定完成");

        if block.is_question {
            return Err(PipelineError::InvalidInput(format!(
                "输入疑似自然语言提问, 不作为工站数据处理 ({})",
                block.reason
            )));
        }

        let mut warnings = Vec::new();

        // 阶段 2-4: 按形态分支 (只对枚举模式匹配)
        let document = match block.shape {
            InputShape::Tabular => {
                let table = self.table_parser.parse(text)?;
                warnings.extend(table.warnings.clone());

                let detection = self.column_detector.detect(&table);
                let detection = if options.column_overrides.is_empty() {
                    detection
                } else {
                    self.column_detector
                        .apply_overrides(detection, &options.column_overrides)
                };

                if !detection.has_station_column {
                    return Err(PipelineError::AmbiguousColumns(
                        "未检测到工站标识列, 请人工指定列角色后重试".to_string(),
                    ));
                }

                let extraction = self.extractor.extract_from_table(
                    &table,
                    &detection,
                    &options.status_filter,
                    options.capture_description,
                );

                ParsedDocument {
                    block,
                    table: Some(table),
                    detection: Some(detection),
                    extraction,
                    warnings: warnings.clone(),
                }
            }
            InputShape::SimpleList => ParsedDocument {
                extraction: self.extractor.extract_from_simple_list(text),
                block,
                table: None,
                detection: None,
                warnings: warnings.clone(),
            },
            InputShape::InlineList => ParsedDocument {
                extraction: self.extractor.extract_from_inline_list(text),
                block,
                table: None,
                detection: None,
                warnings: warnings.clone(),
            },
            InputShape::Unclassified => {
                return Err(PipelineError::InvalidInput(format!(
                    "无法判定输入形态: {}",
                    block.reason
                )));
            }
        };

        if document.extraction.mentions.is_empty() {
            return Err(PipelineError::InvalidInput(
                "未提取到任何工站提及".to_string(),
            ));
        }

        // 阶段 5: 工站解析 (有界并发, 单条降级)
        let (results, summary) = self
            .resolver
            .resolve_all(
                &document.extraction.mentions,
                options.customer_scope.as_deref(),
            )
            .await;

        if summary.unresolved > 0 {
            warnings.push(format!(
                "{}/{} 条提及未能解析为标准工站码",
                summary.unresolved, summary.total
            ));
        }
        if document.extraction.skipped_filtered > 0 {
            warnings.push(format!(
                "{} 行被状态过滤跳过",
                document.extraction.skipped_filtered
            ));
        }

        info!(
            total = summary.total,
            resolved = summary.resolved,
            "工站解析完成"
        );

        Ok(ResolveOutcome {
            document,
            results,
            summary,
            warnings,
        })
    }

    // ==========================================
    // 排序阶段
    // ==========================================

    /// 对解析出的标准工站码集合做候选排序
    ///
    /// 候选集合为空不是错误, 返回空列表 + 警告
    pub fn rank_codes(&self, query_codes: &[String]) -> RankOutcome {
        let mut warnings = Vec::new();

        if self.candidates.is_empty() {
            warnings.push("候选历史配置集合为空, 无法排序".to_string());
            return RankOutcome {
                matches: Vec::new(),
                warnings,
            };
        }

        let matches = self.ranker.rank(query_codes, &self.candidates);
        if matches.iter().any(|m| m.below_threshold) {
            warnings.push(format!(
                "无候选达到相似度门槛 {:.2}, 返回最接近的单条兜底结果",
                self.config.similarity_floor
            ));
        }

        RankOutcome { matches, warnings }
    }

    // ==========================================
    // 报价阶段
    // ==========================================

    /// 基于选中匹配生成报价快照 (成本 + 风险 + 处置)
    pub fn build_quotation(
        &self,
        resolve: &ResolveOutcome,
        selected: &SimilarityMatch,
        options: &SubmissionOptions,
    ) -> Result<QuotationSnapshot, PipelineError> {
        let candidate = self
            .candidates
            .iter()
            .find(|c| c.config_id == selected.config_id)
            .ok_or_else(|| {
                PipelineError::ReferenceUnavailable(format!(
                    "选中配置 {} 不在候选集合中",
                    selected.config_id
                ))
            })?;

        let cost = self.cost_estimator.estimate(&candidate.stations);

        // 风险扫描文本: 提及名称 + 描述 + 解析出的名称
        let mention_texts: Vec<String> = resolve
            .results
            .iter()
            .flat_map(|r| {
                let mut texts = vec![r.mention.name.clone()];
                if let Some(desc) = &r.mention.description {
                    texts.push(desc.clone());
                }
                if let Some(name) = &r.resolved_name {
                    texts.push(name.clone());
                }
                texts
            })
            .collect();

        let risk = self.risk_engine.assess(
            &candidate.stations,
            &mention_texts,
            &cost,
            options.target_monthly_volume,
        );

        // 处置规则 (决策记录见 DESIGN.md):
        // 任一提及未解析 / 匹配低于门槛 / 风险 High → Review Required
        let disposition = if resolve.summary.unresolved > 0
            || selected.below_threshold
            || risk.level == RiskLevel::High
        {
            Disposition::ReviewRequired
        } else {
            Disposition::Proceed
        };

        Ok(QuotationSnapshot {
            snapshot_id: Uuid::new_v4().to_string(),
            customer_scope: options.customer_scope.clone(),
            created_at: Utc::now(),
            resolution: resolve.summary.clone(),
            matched_stations: selected.matched.clone(),
            missing_stations: selected.missing.clone(),
            suggested_stations: selected.extra.clone(),
            selected_match: selected.clone(),
            cost,
            risk,
            disposition,
        })
    }

    // ==========================================
    // 全流程
    // ==========================================

    /// 运行完整管道: 解析 → 排序 → 报价
    pub async fn run_full(
        &self,
        text: &str,
        options: &SubmissionOptions,
    ) -> Result<PipelineRun, PipelineError> {
        let resolve = self.resolve_submission(text, options).await?;
        let rank = self.rank_codes(&resolve.summary.unique_codes);

        let quotation = match rank.matches.first() {
            Some(selected) => Some(self.build_quotation(&resolve, selected, options)?),
            None => None,
        };

        Ok(PipelineRun {
            resolve,
            rank,
            quotation,
        })
    }
}
