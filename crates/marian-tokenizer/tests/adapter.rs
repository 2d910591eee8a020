//! End-to-end adapter checks against a deterministic word-level subword
//! model, exercising the crate the way an embedder with a custom
//! segmentation backend would.

use marian_tokenizer::{
    MTError, MTResult, MarianTokenizer, SubwordModel, TokenizerConfig, VocabTable,
    mask::build_attention_mask,
};

/// A word-splitting segmentation backend defined by this consumer.
struct WordModel;

impl SubwordModel for WordModel {
    fn encode_pieces(
        &self,
        text: &str,
    ) -> MTResult<Vec<String>> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    fn decode_pieces(
        &self,
        pieces: &[String],
    ) -> MTResult<String> {
        Ok(pieces.join(" "))
    }

    fn encode_ids(
        &self,
        text: &str,
    ) -> MTResult<Vec<u32>> {
        Ok(self.encode_pieces(text)?.iter().map(|_| 0).collect())
    }

    fn id_to_piece(
        &self,
        id: u32,
    ) -> MTResult<String> {
        Err(MTError::InvalidArgument(format!(
            "word model has no piece table (id {id})"
        )))
    }
}

const SAMPLES: &[&str] = &[
    "the quick brown fox jumps over the lazy dog",
    "hello world",
    "guten tag",
    "one two three four five six seven eight nine ten",
    "a",
];

const EOS: i64 = 0;
const UNK: i64 = 1;
const PAD: i64 = 9999;

fn build_tokenizer() -> MarianTokenizer {
    // Bind every sample word to an id, leaving 0/1 for eos/unk and a gap
    // before the pad id.
    let mut vocab = serde_json::Map::new();
    vocab.insert("</s>".to_string(), serde_json::json!(EOS));
    vocab.insert("<unk>".to_string(), serde_json::json!(UNK));
    vocab.insert("<pad>".to_string(), serde_json::json!(PAD));

    let mut next = 2i64;
    for sample in SAMPLES {
        for word in sample.split_whitespace() {
            if !vocab.contains_key(word) {
                vocab.insert(word.to_string(), serde_json::json!(next));
                next += 1;
            }
        }
    }
    let vocab_bytes = serde_json::to_vec(&serde_json::Value::Object(vocab)).unwrap();

    let raw_config = format!(
        r#"{{
            "vocab_size": 10000,
            "eos_token_id": {EOS},
            "pad_token_id": {PAD},
            "decoder_start_token_id": {PAD},
            "model_max_length": 16
        }}"#
    )
    .into_bytes();

    MarianTokenizer::from_parts(
        TokenizerConfig::from_slice(&raw_config).unwrap(),
        raw_config,
        VocabTable::from_slice(&vocab_bytes).unwrap(),
        Box::new(WordModel),
        Box::new(WordModel),
    )
}

#[test]
fn roundtrip_plain() {
    let tok = build_tokenizer();
    for text in SAMPLES {
        let ids = tok.encode(text, false).unwrap();
        assert_eq!(
            tok.decode(&ids, false).unwrap(),
            *text,
            "roundtrip mismatch for {text:?}"
        );
    }
}

#[test]
fn roundtrip_with_specials_skipped() {
    let tok = build_tokenizer();
    for text in SAMPLES {
        let ids = tok.encode(text, true).unwrap();
        assert_eq!(*ids.last().unwrap(), EOS);
        assert_eq!(
            tok.decode(&ids, true).unwrap(),
            *text,
            "roundtrip mismatch for {text:?}"
        );
    }
}

#[test]
fn unknown_words_surface_as_unk() {
    let tok = build_tokenizer();
    let ids = tok.encode("hello unmapped world", false).unwrap();
    assert_eq!(ids[1], UNK);
    assert_eq!(tok.decode(&ids, false).unwrap(), "hello <unk> world");
}

#[test]
fn batch_and_mask_agree() {
    let tok = build_tokenizer();
    let texts = [Some("hello world"), None, Some("guten tag")];
    let max_len = 8usize;

    let mut ids = vec![0i64; texts.len() * max_len];
    let mut lens = vec![0usize; texts.len()];
    let used = tok
        .encode_batch_into(&texts, true, max_len, &mut ids, &mut lens)
        .unwrap();

    assert_eq!(used, 3);
    assert_eq!(lens, [3, 0, 3]);

    let lens_i64: Vec<i64> = lens.iter().map(|&n| n as i64).collect();
    let mask = build_attention_mask(&lens_i64, max_len).unwrap();

    for (b, &len) in lens.iter().enumerate() {
        let row = &mask[b * max_len..(b + 1) * max_len];
        for (j, &bit) in row.iter().enumerate() {
            assert_eq!(bit, i64::from(j < len), "row {b} position {j}");
        }
        // Pad positions carry the pad id wherever the mask is 0 on an
        // encoded row.
        if texts[b].is_some() {
            for j in len..max_len {
                assert_eq!(ids[b * max_len + j], PAD);
            }
        }
    }
}

#[test]
fn buffer_capacity_is_distinct_from_truncation() {
    let tok = build_tokenizer();

    // Truncation by model_max_length (16) is silent policy.
    let long = "one two three four five six seven eight nine ten one two three four five six seven";
    let ids = tok.encode(long, true).unwrap();
    assert_eq!(ids.len(), 16);

    // Capacity exhaustion is a hard error.
    let mut out = vec![0i64; 8];
    assert!(matches!(
        tok.encode_into(long, true, &mut out),
        Err(MTError::BufferTooSmall { .. })
    ));
}
