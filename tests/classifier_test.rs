// ==========================================
// InputClassifier 引擎测试
// ==========================================
// 测试目标: 输入形态判定的规则顺序与置信度
// 覆盖范围: 提问检测 / 表格 / 简单列表 / 行内列表 / 兜底
// ==========================================

use station_quote_match::config::HeuristicConfig;
use station_quote_match::domain::types::InputShape;
use station_quote_match::engine::InputClassifier;
use std::sync::Arc;

fn classifier() -> InputClassifier {
    InputClassifier::new(Arc::new(HeuristicConfig::default()))
}

// ==========================================
// 简单列表 / 行内列表
// ==========================================

#[test]
fn test_simple_list_shape() {
    let block = classifier().classify("MBT\nCAL\nRFT\nMMI");
    assert_eq!(block.shape, InputShape::SimpleList);
    assert!(!block.is_question);
    assert!(block.confidence > 0.8);
}

#[test]
fn test_simple_list_with_slash_comments() {
    let block = classifier().classify("MBT / Manual Bench Test\nCAL / Calibration");
    assert_eq!(block.shape, InputShape::SimpleList);
}

#[test]
fn test_inline_list_comma_separated() {
    let block = classifier().classify("MBT, CAL, RFT");
    assert_eq!(block.shape, InputShape::InlineList);
    assert!(!block.is_question);
}

#[test]
fn test_inline_list_space_separated() {
    let block = classifier().classify("MBT CAL RFT MMI");
    assert_eq!(block.shape, InputShape::InlineList);
}

// ==========================================
// 表格
// ==========================================

#[test]
fn test_tabular_shape() {
    let text = "No\tProcess Name\tStatus\n1\tMBT\t1\n2\tCAL\t0";
    let block = classifier().classify(text);
    assert_eq!(block.shape, InputShape::Tabular);
    // 全部行含制表符, 密度 1.0 → 置信度 0.95
    assert!((block.confidence - 0.95).abs() < 1e-9);
}

#[test]
fn test_tabular_with_partial_delimiters() {
    // 3/4 行含制表符: 仍判为表格, 置信度随密度下降
    let text = "A\tB\n1\t2\n3\t4\nplain line";
    let block = classifier().classify(text);
    assert_eq!(block.shape, InputShape::Tabular);
    assert!(block.confidence < 0.95);
}

// ==========================================
// 提问检测
// ==========================================

#[test]
fn test_question_mark_detected() {
    let block = classifier().classify("MBT CAL RFT?");
    assert_eq!(block.shape, InputShape::Unclassified);
    assert!(block.is_question);
}

#[test]
fn test_chinese_question_detected() {
    let block = classifier().classify("请问这条产线需要哪些测试工站");
    assert_eq!(block.shape, InputShape::Unclassified);
    assert!(block.is_question);
}

#[test]
fn test_english_interrogative_detected() {
    let block = classifier().classify("what stations are needed for this board");
    assert!(block.is_question);
}

#[test]
fn test_long_prose_without_delimiters_detected() {
    let text = "we would like to build a new production line for the customer \
                and need your team to review the station layout as soon as possible";
    let block = classifier().classify(text);
    assert_eq!(block.shape, InputShape::Unclassified);
    assert!(block.is_question);
}

#[test]
fn test_interrogative_word_not_matched_inside_token() {
    // "CAN-BUS" 不应被疑问词 "can" 整词命中
    let block = classifier().classify("CAN-BUS\nMBT\nCAL");
    assert!(!block.is_question);
    assert_eq!(block.shape, InputShape::SimpleList);
}

#[test]
fn test_can_station_token_not_treated_as_question() {
    // CAN 总线测试站是合法工站码, 单独出现不判定为提问
    let block = classifier().classify("MBT\nCAN\nCAL");
    assert!(!block.is_question);
    assert_eq!(block.shape, InputShape::SimpleList);
}

#[test]
fn test_modal_in_sentence_form_detected_as_question() {
    // 情态词 + 长句形态
    let block = classifier().classify("can you quote these test stations for us");
    assert_eq!(block.shape, InputShape::Unclassified);
    assert!(block.is_question);
}

// ==========================================
// 兜底
// ==========================================

#[test]
fn test_empty_input_unclassified() {
    let block = classifier().classify("   ");
    assert_eq!(block.shape, InputShape::Unclassified);
    assert!(!block.is_question);
    assert_eq!(block.confidence, 0.0);
}

#[test]
fn test_unclassifiable_low_confidence() {
    // 多行长文本: 非表格、行不似工站码
    let text = "这是一段很长很长的描述文字用于说明某些背景信息而不是工站清单内容\n\
                第二行同样是不含任何分隔符的长篇说明文字请不要当作工站数据处理啦";
    let block = classifier().classify(text);
    assert_eq!(block.shape, InputShape::Unclassified);
    assert!(block.confidence <= 0.2);
}
