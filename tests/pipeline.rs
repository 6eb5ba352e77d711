use legal_chunker::assembler::keys;
use legal_chunker::{
    chunk_document, normalize, normalize_structured, Chunk, ChunkError, ChunkerConfig, ConfigError,
    DocumentFormat, Document, LegalChunker,
};

const CODE: &str = "\
Жилищный кодекс

Раздел I. Общие положения
Глава 1. Основные начала
Статья 1. Основные начала жилищного законодательства
1. Жилищное законодательство основывается на необходимости обеспечения органами власти условий для осуществления гражданами права на жилище.
2. Граждане по своему усмотрению и в своих интересах осуществляют принадлежащие им жилищные права.
Статья 2. Обеспечение условий
Органы государственной власти в пределах своих полномочий обеспечивают условия для осуществления гражданами права на жилище.
Глава 2. Объекты жилищных прав
Статья 15. Объекты жилищных прав
1. Объектами жилищных прав являются жилые помещения.
Раздел II. Право собственности
Статья 30. Права и обязанности собственника
Собственник жилого помещения осуществляет права владения, пользования и распоряжения.
Глава 5. Права и обязанности
Статья 31. Права членов семьи
1. Члены семьи собственника имеют право пользования жилым помещением.
";

fn config(min: usize, max: usize, overlap: usize) -> ChunkerConfig {
    ChunkerConfig {
        min_chunk_size: min,
        max_chunk_size: max,
        overlap_words: overlap,
        ..ChunkerConfig::default()
    }
}

fn prose(sentences: usize) -> String {
    (0..sentences)
        .map(|i| format!("Наймодатель обязан передать нанимателю свободное жилое помещение номер {}.", i))
        .collect::<Vec<_>>()
        .join(" ")
}

fn chunk(text: &str, config: &ChunkerConfig) -> Vec<Chunk> {
    chunk_document(&Document::new("code.txt", text), config).unwrap()
}

#[test]
fn test_article_with_two_points() {
    let text = "Статья 5. Право на жилище\n1. Текст первого пункта.\n2. Текст второго пункта.";
    let chunks = chunk(text, &config(500, 1000, 50));

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].get_str(keys::POINT_NUMBER), Some("1"));
    assert_eq!(chunks[1].get_str(keys::POINT_NUMBER), Some("2"));
    for chunk in &chunks {
        assert_eq!(chunk.get_str(keys::ARTICLE), Some("5"));
        assert!(chunk.text.contains("Статья 5"));
    }
}

#[test]
fn test_paragraph_fallback() {
    let chunks = chunk(
        "Первый абзац без заголовков.\n\nВторой абзац без заголовков.",
        &ChunkerConfig::default(),
    );

    assert_eq!(chunks.len(), 2);
    for (chunk, part) in chunks.iter().zip([1, 2]) {
        assert_eq!(chunk.get_u64(keys::PART), Some(part));
        assert_eq!(chunk.get(keys::SECTION), None);
        assert_eq!(chunk.get(keys::CHAPTER), None);
        assert_eq!(chunk.get(keys::ARTICLE), None);
    }
}

#[test]
fn test_long_point_split_with_overlap() {
    let body = prose(40);
    assert!(body.chars().count() >= 3000);
    let text = format!("Статья 65. Права и обязанности наймодателя\n1. {}", body);

    let chunks = chunk(&text, &config(500, 1000, 20));

    assert!(chunks.len() > 1);
    for (idx, chunk) in chunks.iter().enumerate() {
        assert!(chunk.char_len() <= 1000, "chunk {} has {} chars", idx, chunk.char_len());
        assert!(!chunk.length_exceeded);
        assert_eq!(chunk.get_u64(keys::PART), Some(idx as u64 + 1));
        assert_eq!(chunk.get_str(keys::ARTICLE), Some("65"));
    }

    for pair in chunks.windows(2) {
        let prev: Vec<&str> = pair[0].text.split_whitespace().collect();
        let next: Vec<&str> = pair[1].text.split_whitespace().collect();
        assert_eq!(&next[..20], &prev[prev.len() - 20..]);
    }
}

#[test]
fn test_min_above_max_is_config_error() {
    let result = chunk_document(
        &Document::new("code.txt", "Статья 1. Текст"),
        &config(600, 500, 50),
    );

    match result {
        Err(ChunkError::Config(ConfigError::MinExceedsMax { min, max })) => {
            assert_eq!((min, max), (600, 500));
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_empty_document() {
    assert!(chunk("", &ChunkerConfig::default()).is_empty());
    assert!(chunk(" \n\n [12] \n", &ChunkerConfig::default()).is_empty());
}

#[test]
fn test_deterministic_output() {
    let first = chunk(CODE, &config(100, 300, 10));
    let second = chunk(CODE, &config(100, 300, 10));

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_document_order_preserved() {
    let chunks = chunk(CODE, &ChunkerConfig::default());
    let normalized = normalize_structured(CODE);

    let articles: Vec<&str> = chunks
        .iter()
        .filter_map(|c| c.get_str(keys::ARTICLE))
        .collect();
    assert_eq!(articles, vec!["1", "1", "2", "15", "30", "31"]);

    // Body of every chunk appears in the document after the previous one
    let mut cursor = 0;
    for chunk in &chunks {
        let body = chunk.text.lines().last().unwrap();
        let found = normalized[cursor..]
            .find(body)
            .unwrap_or_else(|| panic!("{:?} missing or out of order", body));
        cursor += found;
    }
}

#[test]
fn test_ancestry_consistency() {
    let chunks = chunk(CODE, &ChunkerConfig::default());
    let by_article = |number: &str| {
        chunks
            .iter()
            .find(|c| c.get_str(keys::ARTICLE) == Some(number))
            .unwrap()
    };

    let first = by_article("1");
    assert_eq!(first.get_str(keys::SECTION), Some("I"));
    assert_eq!(first.get_str(keys::CHAPTER), Some("1"));

    let fifteen = by_article("15");
    assert_eq!(fifteen.get_str(keys::SECTION), Some("I"));
    assert_eq!(fifteen.get_str(keys::CHAPTER), Some("2"));

    // A new section closes the previous chapter
    let thirty = by_article("30");
    assert_eq!(thirty.get_str(keys::SECTION), Some("II"));
    assert_eq!(thirty.get(keys::CHAPTER), None);

    let thirty_one = by_article("31");
    assert_eq!(thirty_one.get_str(keys::SECTION), Some("II"));
    assert_eq!(thirty_one.get_str(keys::CHAPTER), Some("5"));

    for chunk in &chunks {
        if chunk.get(keys::CHAPTER).is_some() {
            assert!(chunk.get(keys::SECTION).is_some());
        }
    }
}

#[test]
fn test_preamble_kept_without_ancestry() {
    let chunks = chunk(CODE, &ChunkerConfig::default());
    assert_eq!(chunks[0].text, "Жилищный кодекс");
    assert_eq!(chunks[0].get(keys::SECTION), None);
    assert_eq!(chunks[0].get(keys::PART), None);
}

#[test]
fn test_size_bound_or_flagged() {
    let mut text = String::from(CODE);
    text.push_str("Статья 99. Длинная\n");
    text.push_str(&prose(30));
    text.push_str("\nСтатья 100. Без точек\n");
    text.push_str(&vec!["слово"; 150].join(" "));

    let chunks = chunk(&text, &config(200, 400, 10));

    let mut flagged = 0;
    for chunk in &chunks {
        if chunk.length_exceeded {
            flagged += 1;
            assert!(chunk.char_len() > 400);
        } else {
            assert!(chunk.char_len() <= 400, "{:?}", chunk.text);
        }
    }
    assert_eq!(flagged, 1);
}

#[test]
fn test_chunk_ids_unique_across_document() {
    let chunks = chunk(CODE, &config(100, 300, 5));
    let ids: std::collections::HashSet<_> = chunks.iter().map(|c| c.chunk_id.as_str()).collect();
    assert_eq!(ids.len(), chunks.len());
}

#[test]
fn test_malformed_heading_continues() {
    let chunks = chunk("Статья 1. Первая\nТекст.\nСтатья. Без номера\nЕщё текст.", &ChunkerConfig::default());

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[1].get(keys::ARTICLE), None);
    assert_eq!(chunks[1].get_str(keys::TITLE), Some("Без номера"));
}

#[test]
fn test_normalization_idempotent() {
    let samples = [
        CODE,
        "  <p>Статья&nbsp;1.</p>\r\n[12]\r\n&amp;amp; &#x41; &bogus;\u{200b}",
        "<<b>>&lt;p&gt;текст&lt;/p&gt;",
        "",
        "\n\n\n",
    ];
    for sample in samples {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once, "flat: {:?}", sample);

        let once = normalize_structured(sample);
        assert_eq!(normalize_structured(&once), once, "structured: {:?}", sample);
    }
}

#[test]
fn test_formats_converge() {
    let chunker = LegalChunker::new(ChunkerConfig::default()).unwrap();
    let html = "<html><body><h2>Статья 5. Право на жилище</h2>\
                <p>1. Текст первого пункта.</p><p>2. Текст второго пункта.</p></body></html>";
    let plain = "Статья 5. Право на жилище\n1. Текст первого пункта.\n2. Текст второго пункта.";

    let from_html = chunker.chunk_bytes("jk.html", html.as_bytes()).unwrap();
    let from_text = chunker.chunk_bytes("jk.txt", plain.as_bytes()).unwrap();

    assert_eq!(from_html.metadata.format, DocumentFormat::Html);
    assert_eq!(from_text.metadata.format, DocumentFormat::Text);

    let ids = |chunks: &[Chunk]| chunks.iter().map(|c| c.chunk_id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&from_html.chunks), ids(&from_text.chunks));
}

#[test]
fn test_parallel_preserves_order() {
    let mut text = String::new();
    for article in 1..=40 {
        text.push_str(&format!("Статья {}. Заголовок\n1. {}\n", article, prose(article % 9 + 1)));
    }

    let sequential = chunk(&text, &config(150, 300, 5));
    let parallel = chunk(
        &text,
        &ChunkerConfig {
            parallel: true,
            ..config(150, 300, 5)
        },
    );
    assert_eq!(sequential, parallel);
}
