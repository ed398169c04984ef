//! Index definition for the documents index
//!
//! Title and content get language-aware analysis; `content` is copied into
//! n-gram, Japanese and English sub-fields so partial and mixed-language
//! queries still hit.

use serde_json::{json, Value};

/// Builds the settings and mappings body used when creating the index
pub fn index_definition(index_name: &str, description: Option<&str>) -> Value {
    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Documents for {}", index_name));

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0,
            "analysis": {
                "analyzer": {
                    "english_analyzer": {
                        "type": "standard",
                        "stopwords": "_english_"
                    },
                    "ngram_analyzer": {
                        "type": "custom",
                        "tokenizer": "ngram_tokenizer"
                    }
                },
                "tokenizer": {
                    "ngram_tokenizer": {
                        "type": "ngram",
                        "min_gram": 2,
                        "max_gram": 3
                    }
                }
            }
        },
        "mappings": {
            "_meta": {
                "description": description
            },
            "properties": {
                "url": { "type": "keyword" },
                "title": { "type": "text", "analyzer": "kuromoji" },
                "content": {
                    "type": "text",
                    "analyzer": "english_analyzer",
                    "copy_to": ["content_ngram", "content_ja", "content_en"]
                },
                "content_ngram": { "type": "text", "analyzer": "ngram_analyzer" },
                "content_ja": { "type": "text", "analyzer": "kuromoji" },
                "content_en": { "type": "text", "analyzer": "english_analyzer" },
                "content_length": { "type": "long" },
                "mime_type": { "type": "keyword" },
                "timestamp": { "type": "date" }
            }
        }
    })
}
