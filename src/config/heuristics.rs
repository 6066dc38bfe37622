// ==========================================
// 制造工站报价匹配系统 - 启发式配置
// ==========================================
// 职责: 列角色关键词表、取值模式阈值、解析/排序门槛
// 红线: 启动时注入, 运行期只读, 测试可整体替换
// ==========================================

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ==========================================
// ColumnKeywords - 列角色关键词表
// ==========================================
/// 表头小写后做包含匹配, 命中即以 0.9 置信度赋予角色。
/// 匹配顺序: 工站 → 状态 → 区段 → 描述 → 序号
/// (描述先于序号, 避免 "note" 被 "no" 截获)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnKeywords {
    #[serde(default = "default_station_keywords")]
    pub station: Vec<String>,
    #[serde(default = "default_status_keywords")]
    pub status: Vec<String>,
    #[serde(default = "default_section_keywords")]
    pub section: Vec<String>,
    #[serde(default = "default_description_keywords")]
    pub description: Vec<String>,
    #[serde(default = "default_sequence_keywords")]
    pub sequence: Vec<String>,
}

fn default_station_keywords() -> Vec<String> {
    [
        "station", "process", "工站", "工序", "制程", "測試站", "测试站", "공정", "테스트",
        "テスト", "工程名", "item name", "test item",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_status_keywords() -> Vec<String> {
    ["status", "select", "enable", "use", "状态", "狀態", "选用", "選用", "是否", "사용"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_section_keywords() -> Vec<String> {
    [
        "section", "board", "group", "segment", "区段", "區段", "板类", "板類", "模块", "模組",
        "基板",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_description_keywords() -> Vec<String> {
    ["description", "desc", "remark", "note", "comment", "备注", "備註", "说明", "說明", "描述"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_sequence_keywords() -> Vec<String> {
    ["no", "no.", "#", "seq", "index", "序号", "序號", "编号", "編號", "순번"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ColumnKeywords {
    fn default() -> Self {
        Self {
            station: default_station_keywords(),
            status: default_status_keywords(),
            section: default_section_keywords(),
            description: default_description_keywords(),
            sequence: default_sequence_keywords(),
        }
    }
}

// ==========================================
// QuestionWords - 提问词表
// ==========================================
/// 分类器用于识别自然语言提问的疑问词 (多语言)
fn default_question_words() -> Vec<String> {
    [
        "what", "how", "why", "which", "when", "where", "who",
        "请问", "什么", "甚麼", "如何", "怎么", "怎麼", "为什么", "為什麼", "哪些", "吗", "嗎",
        "呢", "무엇", "어떻게",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// 歧义情态词: 可能是提问开头, 也可能是合法工站码 (如 CAN 总线测试),
/// 单独命中不判定为提问, 需叠加句子形态信号
fn default_ambiguous_modal_words() -> Vec<String> {
    ["can", "could", "should"].iter().map(|s| s.to_string()).collect()
}

// ==========================================
// HeuristicConfig - 启发式配置全集
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// 列角色关键词表
    #[serde(default)]
    pub keywords: ColumnKeywords,

    /// 疑问词表
    #[serde(default = "default_question_words")]
    pub question_words: Vec<String>,

    /// 歧义情态词表 (需叠加句子形态信号才判定为提问)
    #[serde(default = "default_ambiguous_modal_words")]
    pub ambiguous_modal_words: Vec<String>,

    /// 关键词命中的角色置信度
    #[serde(default = "default_keyword_confidence")]
    pub keyword_confidence: f64,

    /// 取值模式 (枚举值/全数字) 的角色置信度
    #[serde(default = "default_value_pattern_confidence")]
    pub value_pattern_confidence: f64,

    /// 短 token 推断为工站列的置信度
    #[serde(default = "default_weak_station_confidence")]
    pub weak_station_confidence: f64,

    /// 无法判定列的置信度
    #[serde(default = "default_ignore_confidence")]
    pub ignore_confidence: f64,

    /// 列角色取值采样行数
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,

    /// 工站 token 最大长度 (超过则不认为是工站码)
    #[serde(default = "default_station_token_max_len")]
    pub station_token_max_len: usize,

    /// 描述捕获的最小长度 (字符数)
    #[serde(default = "default_description_min_len")]
    pub description_min_len: usize,

    // ===== 解析阈值 (决策记录见 DESIGN.md) =====
    /// 语义匹配最低接受余弦相似度
    #[serde(default = "default_semantic_accept_min")]
    pub semantic_accept_min: f64,

    /// 语义匹配达到 Medium 置信度的余弦相似度
    #[serde(default = "default_semantic_medium_min")]
    pub semantic_medium_min: f64,

    /// 别名自身置信度达到 High 的下限
    #[serde(default = "default_alias_high_confidence_min")]
    pub alias_high_confidence_min: f64,

    // ===== 排序阈值 =====
    /// 进入排名的最低相似度
    #[serde(default = "default_similarity_floor")]
    pub similarity_floor: f64,

    /// 返回的候选数上限
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    // ===== 并发与外部调用 =====
    /// 批量解析的并发上限
    #[serde(default = "default_resolve_concurrency")]
    pub resolve_concurrency: usize,

    /// 外部调用超时 (毫秒)
    #[serde(default = "default_external_timeout_ms")]
    pub external_timeout_ms: u64,

    /// 外部调用重试次数上限
    #[serde(default = "default_external_max_retries")]
    pub external_max_retries: u32,

    /// 重试退避基数 (毫秒, 指数退避)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_keyword_confidence() -> f64 {
    0.9
}
fn default_value_pattern_confidence() -> f64 {
    0.7
}
fn default_weak_station_confidence() -> f64 {
    0.5
}
fn default_ignore_confidence() -> f64 {
    0.3
}
fn default_sample_rows() -> usize {
    5
}
fn default_station_token_max_len() -> usize {
    30
}
fn default_description_min_len() -> usize {
    20
}
fn default_semantic_accept_min() -> f64 {
    0.60
}
fn default_semantic_medium_min() -> f64 {
    0.75
}
fn default_alias_high_confidence_min() -> f64 {
    0.80
}
fn default_similarity_floor() -> f64 {
    0.30
}
fn default_top_k() -> usize {
    5
}
fn default_resolve_concurrency() -> usize {
    4
}
fn default_external_timeout_ms() -> u64 {
    5_000
}
fn default_external_max_retries() -> u32 {
    2
}
fn default_retry_backoff_ms() -> u64 {
    200
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            keywords: ColumnKeywords::default(),
            question_words: default_question_words(),
            ambiguous_modal_words: default_ambiguous_modal_words(),
            keyword_confidence: default_keyword_confidence(),
            value_pattern_confidence: default_value_pattern_confidence(),
            weak_station_confidence: default_weak_station_confidence(),
            ignore_confidence: default_ignore_confidence(),
            sample_rows: default_sample_rows(),
            station_token_max_len: default_station_token_max_len(),
            description_min_len: default_description_min_len(),
            semantic_accept_min: default_semantic_accept_min(),
            semantic_medium_min: default_semantic_medium_min(),
            alias_high_confidence_min: default_alias_high_confidence_min(),
            similarity_floor: default_similarity_floor(),
            top_k: default_top_k(),
            resolve_concurrency: default_resolve_concurrency(),
            external_timeout_ms: default_external_timeout_ms(),
            external_max_retries: default_external_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl HeuristicConfig {
    /// 从 JSON 文件加载配置 (缺失字段取默认值)
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }
}

// ==========================================
// CostParameters - 成本常量
// ==========================================
/// 成本估算使用的固定常量 (决策记录见 DESIGN.md)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostParameters {
    /// 日运转小时
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,

    /// 月运转天数
    #[serde(default = "default_days_per_month")]
    pub days_per_month: f64,

    /// 设备投资摊销月数
    #[serde(default = "default_amortization_months")]
    pub amortization_months: f64,

    /// 每人每月人力成本
    #[serde(default = "default_labor_cost_per_head_month")]
    pub labor_cost_per_head_month: f64,

    /// 产线利用率告警阈值 (目标量 / 月产能)
    #[serde(default = "default_utilization_warn_ratio")]
    pub utilization_warn_ratio: f64,
}

fn default_hours_per_day() -> f64 {
    20.0
}
fn default_days_per_month() -> f64 {
    26.0
}
fn default_amortization_months() -> f64 {
    24.0
}
fn default_labor_cost_per_head_month() -> f64 {
    6_500.0
}
fn default_utilization_warn_ratio() -> f64 {
    0.85
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            hours_per_day: default_hours_per_day(),
            days_per_month: default_days_per_month(),
            amortization_months: default_amortization_months(),
            labor_cost_per_head_month: default_labor_cost_per_head_month(),
            utilization_warn_ratio: default_utilization_warn_ratio(),
        }
    }
}
