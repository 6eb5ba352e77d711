use super::*;

// ========================================================================
// Flat mode
// ========================================================================

#[test]
fn test_collapses_whitespace() {
    assert_eq!(normalize("  Статья   1.\n\n\tТекст  "), "Статья 1. Текст");
}

#[test]
fn test_removes_page_numbers() {
    assert_eq!(normalize("первая часть\n[12]\nвторая часть"), "первая часть вторая часть");
}

#[test]
fn test_keeps_inline_brackets() {
    assert_eq!(normalize("см. пункт [3] выше"), "см. пункт [3] выше");
}

#[test]
fn test_strips_tags() {
    assert_eq!(normalize("<p>Статья <b>5</b>.</p>"), "Статья 5.");
}

#[test]
fn test_keeps_comparison_operators() {
    assert_eq!(normalize("если a < b и c > d"), "если a < b и c > d");
}

#[test]
fn test_decodes_entities() {
    assert_eq!(
        normalize("&laquo;Жилищный&raquo;&nbsp;кодекс &#8470; 1 &amp; &#x41;"),
        "«Жилищный» кодекс № 1 & A"
    );
}

#[test]
fn test_malformed_entities_pass_through() {
    assert_eq!(normalize("&unknown; & &#0; &#xZZ;"), "&unknown; & &#0; &#xZZ;");
}

#[test]
fn test_special_spaces_become_spaces() {
    assert_eq!(normalize("a\u{00a0}b\u{200b}c\u{202f}d\u{feff}e"), "a b c d e");
}

#[test]
fn test_empty_input() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize(" \n\t "), "");
}

// ========================================================================
// Structured mode
// ========================================================================

#[test]
fn test_structured_keeps_lines() {
    assert_eq!(
        normalize_structured("Статья 1.  Заголовок \n 1. Первый\r\n2. Второй"),
        "Статья 1. Заголовок\n1. Первый\n2. Второй"
    );
}

#[test]
fn test_structured_collapses_blank_runs() {
    assert_eq!(
        normalize_structured("\n\nпервый абзац\n\n\n\n  \nвторой абзац\n\n"),
        "первый абзац\n\nвторой абзац"
    );
}

#[test]
fn test_structured_page_number_does_not_split_paragraph() {
    assert_eq!(normalize_structured("строка\n[7]\nпродолжение"), "строка\nпродолжение");
}

#[test]
fn test_structured_block_tags_break_lines() {
    assert_eq!(
        normalize_structured("<p>Статья 1.</p><p>Текст статьи</p>"),
        "Статья 1.\n\nТекст статьи"
    );
}

// ========================================================================
// Idempotence
// ========================================================================

#[test]
fn test_idempotent_on_nested_escapes() {
    let inputs = [
        "&amp;lt;b&amp;gt;жирный&amp;lt;/b&amp;gt;",
        "&amp;amp;nbsp;",
        "&lt;p&gt;Статья 1&lt;/p&gt;\n[3]\n",
        "x\u{00a0}\u{00a0}y\n\n\n z",
        "<div>\n[1]\n</div>&#160;",
    ];

    for input in inputs {
        let once = normalize(input);
        assert_eq!(normalize(&once), once, "flat mode not idempotent for {:?}", input);

        let once = normalize_structured(input);
        assert_eq!(
            normalize_structured(&once),
            once,
            "structured mode not idempotent for {:?}",
            input
        );
    }
}

#[test]
fn test_nested_escape_fully_decoded() {
    assert_eq!(normalize("&amp;lt;b&amp;gt;текст"), "текст");
}

#[test]
fn test_decode_entities_without_ampersand() {
    assert_eq!(decode_entities("простой текст"), "простой текст");
}

#[test]
fn test_decodes_html5_named_references() {
    assert_eq!(
        normalize("&frac12; &sup2; &ordm; &Prime; &minus; &hyphen; &nbsp;x"),
        "½ ² º ″ − ‐ x"
    );
    assert_eq!(decode_entities("&sect;&nbsp;5 &laquo;б&raquo;"), "§\u{a0}5 «б»");
}

#[test]
fn test_unknown_name_beside_known_one() {
    assert_eq!(decode_entities("&bogus;&mdash;&amp;"), "&bogus;—&");
}

// ========================================================================
// Already-decoded text
// ========================================================================

#[test]
fn test_decoded_keeps_escaped_markup() {
    let text = "Код <b>важно</b> и &nbsp; A &amp; B";
    assert_eq!(normalize_decoded(text), text);
}

#[test]
fn test_decoded_cleans_layout() {
    assert_eq!(
        normalize_decoded("  Статья\u{a0}1.  \r\n[3]\r\n\n\n\nТекст  "),
        "Статья 1.\n\nТекст"
    );
}

#[test]
fn test_decoded_idempotent() {
    let once = normalize_decoded("a <p>\n\n\n\n[4]\n&lt;b&gt;\u{200b}");
    assert_eq!(normalize_decoded(&once), once);
}
