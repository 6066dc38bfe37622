// ==========================================
// TableParser 引擎测试
// ==========================================
// 测试目标: 网格规则化与补齐不变式
// 覆盖范围: 补齐 / 单元格清洗 / 双语表头合并 / 行号追溯
// ==========================================

use station_quote_match::engine::TableParser;

// ==========================================
// 补齐不变式
// ==========================================

#[test]
fn test_every_row_padded_to_column_count() {
    let text = "A\tB\tC\nx\ty\nz";
    let table = TableParser::new().parse(text).unwrap();

    assert_eq!(table.column_count, 3);
    for row in &table.rows {
        assert_eq!(row.cells.len(), table.column_count);
    }
    // 短行以空串补齐
    assert_eq!(table.rows[0].cells, vec!["x", "y", ""]);
    assert_eq!(table.rows[1].cells, vec!["z", "", ""]);
    assert!(table.warnings.iter().any(|w| w.contains("补空串")));
}

#[test]
fn test_header_row_also_padded() {
    // 表头比数据行短: 列数取全表最大值
    let text = "A\tB\n1\t2\t3";
    let table = TableParser::new().parse(text).unwrap();

    assert_eq!(table.column_count, 3);
    assert_eq!(table.headers, vec!["A", "B", ""]);
}

#[test]
fn test_blank_lines_skipped() {
    let text = "A\tB\n\n1\t2\n   \n3\t4";
    let table = TableParser::new().parse(text).unwrap();
    assert_eq!(table.row_count(), 2);
}

// ==========================================
// 单元格清洗
// ==========================================

#[test]
fn test_cell_cleaning() {
    let text = "H1\tH2\n  \"MBT\"  \t  a   b  ";
    let table = TableParser::new().parse_with_options(text, false).unwrap();

    assert_eq!(table.rows[0].cells[0], "MBT");
    // 连续空白压缩为单个空格
    assert_eq!(table.rows[0].cells[1], "a b");
}

// ==========================================
// 双语表头合并
// ==========================================

#[test]
fn test_continuation_header_merged() {
    let text = "Process\tStatus\n工序\t状态\nMBT\t1";
    let table = TableParser::new().parse(text).unwrap();

    assert_eq!(table.headers, vec!["Process / 工序", "Status / 状态"]);
    assert_eq!(table.row_count(), 1);
    assert!(table.warnings.iter().any(|w| w.contains("表头")));
}

#[test]
fn test_numeric_first_row_not_merged() {
    // 首个数据行含数字: 是真实数据, 不并入表头
    let text = "No\tProcess\n1\tMBT\n2\tCAL";
    let table = TableParser::new().parse(text).unwrap();

    assert_eq!(table.headers, vec!["No", "Process"]);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_merge_disabled_by_option() {
    let text = "Process\tStatus\n工序\t状态\nMBT\t1";
    let table = TableParser::new().parse_with_options(text, false).unwrap();

    assert_eq!(table.headers, vec!["Process", "Status"]);
    assert_eq!(table.row_count(), 2);
}

// ==========================================
// 行号追溯
// ==========================================

#[test]
fn test_source_line_retained() {
    let text = "H\n\nMBT\nCAL";
    let table = TableParser::new().parse(text).unwrap();

    // 空行被跳过, 但保留原始行号
    assert_eq!(table.rows[0].source_line, 2);
    assert_eq!(table.rows[1].source_line, 3);
}

// ==========================================
// 错误
// ==========================================

#[test]
fn test_empty_text_rejected() {
    assert!(TableParser::new().parse("   \n  ").is_err());
}
