// ==========================================
// 制造工站报价匹配系统 - 输入分类器
// ==========================================
// 职责: 判定原始文本块的输入形态
// 红线: 纯函数, 无副作用; 形态只在这里判定一次
// 规则顺序: 提问检测 → 表格 → 简单列表 → 行内列表 → 无法判定
// ==========================================

use crate::config::HeuristicConfig;
use crate::domain::table::RawInputBlock;
use crate::domain::types::InputShape;
use std::sync::Arc;

// ==========================================
// InputClassifier - 输入分类器
// ==========================================
pub struct InputClassifier {
    config: Arc<HeuristicConfig>,
}

impl InputClassifier {
    /// 构造函数
    pub fn new(config: Arc<HeuristicConfig>) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对原始文本做形态判定
    ///
    /// 规则按顺序求值, 首个命中即返回:
    /// 1) 自然语言/提问 → Unclassified (is_question = true)
    /// 2) 多行含制表符 → Tabular (置信度随分隔符密度)
    /// 3) 多行无分隔符且多数行形似工站码 → SimpleList
    /// 4) 单行逗号/空格分隔且多数 token 形似工站码 → InlineList
    /// 5) 其余 → Unclassified (低置信度)
    pub fn classify(&self, text: &str) -> RawInputBlock {
        let trimmed = text.trim();
        let lines: Vec<&str> = trimmed
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        // 规则 1: 提问/自然语言检测
        if let Some(reason) = self.detect_question(trimmed, &lines) {
            return RawInputBlock {
                text: text.to_string(),
                shape: InputShape::Unclassified,
                confidence: 0.9,
                is_question: true,
                reason,
            };
        }

        if lines.is_empty() {
            return RawInputBlock {
                text: text.to_string(),
                shape: InputShape::Unclassified,
                confidence: 0.0,
                is_question: false,
                reason: "输入为空".to_string(),
            };
        }

        // 规则 2: 制表符分隔的表格
        if lines.len() >= 2 {
            let tab_lines = lines.iter().filter(|l| l.contains('\t')).count();
            if tab_lines >= 2 {
                let density = tab_lines as f64 / lines.len() as f64;
                return RawInputBlock {
                    text: text.to_string(),
                    shape: InputShape::Tabular,
                    confidence: 0.5 + 0.45 * density,
                    is_question: false,
                    reason: format!("{}/{} 行含制表符分隔", tab_lines, lines.len()),
                };
            }
        }

        // 规则 3: 多行简单列表
        if lines.len() >= 2 {
            let token_lines = lines
                .iter()
                .filter(|l| self.looks_like_station_line(l))
                .count();
            let ratio = token_lines as f64 / lines.len() as f64;
            if ratio >= 0.6 {
                return RawInputBlock {
                    text: text.to_string(),
                    shape: InputShape::SimpleList,
                    confidence: 0.5 + 0.4 * ratio,
                    is_question: false,
                    reason: format!("{}/{} 行形似工站名称", token_lines, lines.len()),
                };
            }
        }

        // 规则 4: 单行行内列表
        if lines.len() == 1 {
            let tokens = split_inline_tokens(lines[0]);
            if tokens.len() >= 2 {
                let code_like = tokens
                    .iter()
                    .filter(|t| self.looks_like_station_token(t))
                    .count();
                let ratio = code_like as f64 / tokens.len() as f64;
                if ratio >= 0.6 {
                    return RawInputBlock {
                        text: text.to_string(),
                        shape: InputShape::InlineList,
                        confidence: 0.5 + 0.4 * ratio,
                        is_question: false,
                        reason: format!("{}/{} 个 token 形似工站码", code_like, tokens.len()),
                    };
                }
            }
        }

        // 规则 5: 无法判定
        RawInputBlock {
            text: text.to_string(),
            shape: InputShape::Unclassified,
            confidence: 0.2,
            is_question: false,
            reason: "未命中任何形态规则".to_string(),
        }
    }

    // ==========================================
    // 提问检测
    // ==========================================

    /// 返回 Some(reason) 表示命中提问/自然语言
    fn detect_question(&self, trimmed: &str, lines: &[&str]) -> Option<String> {
        if trimmed.is_empty() {
            return None;
        }

        // 以问号结尾
        if trimmed.ends_with('?') || trimmed.ends_with('？') {
            return Some("文本以问号结尾".to_string());
        }

        // 疑问词命中: ASCII 词按整词比较, CJK 词按包含比较
        let lower = trimmed.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| c.is_whitespace() || c == ',' || c == '.' || c == '、')
            .filter(|w| !w.is_empty())
            .collect();
        for qw in &self.config.question_words {
            let hit = if qw.is_ascii() {
                words.iter().any(|w| w == qw)
            } else {
                lower.contains(qw.as_str())
            };
            if hit {
                return Some(format!("命中疑问词 \"{}\"", qw));
            }
        }

        // 歧义情态词 (can/could/should 亦可能是工站码):
        // 要求命中两次, 或所在行呈句子形态 (超过 5 个词)
        if let Some(reason) = self.detect_ambiguous_modal(lines) {
            return Some(reason);
        }

        // 单行长篇散文 (无分隔符, 词数多) 不当作工站数据
        if lines.len() == 1 {
            let line = lines[0];
            let word_count = line.split_whitespace().count();
            if line.chars().count() > 60 && word_count > 8 && !line.contains('\t') && !line.contains(',')
            {
                return Some("单行长文本且无分隔符, 疑似自然语言".to_string());
            }
        }

        None
    }

    /// 歧义情态词判定: 单行单词命中不算提问
    fn detect_ambiguous_modal(&self, lines: &[&str]) -> Option<String> {
        let mut hits = 0usize;
        for line in lines {
            let line_lower = line.to_lowercase();
            let line_words: Vec<&str> = line_lower
                .split(|c: char| c.is_whitespace() || c == ',' || c == '.' || c == '、')
                .filter(|w| !w.is_empty())
                .collect();
            for mw in &self.config.ambiguous_modal_words {
                if line_words.iter().any(|w| w == mw) {
                    hits += 1;
                    if line_words.len() > 5 {
                        return Some(format!("命中情态词 \"{}\" 且所在行为长句", mw));
                    }
                }
            }
        }
        if hits >= 2 {
            return Some("多次命中歧义情态词".to_string());
        }
        None
    }

    // ==========================================
    // token 形态判定
    // ==========================================

    /// 单个 token 是否形似工站码: 非空、长度受限、
    /// 仅含字母数字/下划线/连字符/CJK
    fn looks_like_station_token(&self, token: &str) -> bool {
        let token = token.trim();
        if token.is_empty() || token.chars().count() >= self.config.station_token_max_len {
            return false;
        }
        token
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
    }

    /// 简单列表中的一行是否形似工站名称
    ///
    /// 允许 "MBT / Manual Bench Test" 这类带斜杠注释的行:
    /// 取首个斜杠/空白前的 token 判定
    fn looks_like_station_line(&self, line: &str) -> bool {
        let head = line
            .split(|c: char| c == '/' || c.is_whitespace())
            .find(|t| !t.is_empty())
            .unwrap_or("");
        self.looks_like_station_token(head) && line.chars().count() < 60
    }
}

/// 行内列表的 token 切分: 逗号优先, 否则按空白
pub fn split_inline_tokens(line: &str) -> Vec<String> {
    let parts: Vec<String> = if line.contains(',') || line.contains('，') {
        line.split([',', '，'])
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    } else {
        line.split_whitespace().map(|t| t.to_string()).collect()
    };
    parts
}
