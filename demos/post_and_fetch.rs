//! Post a file to an in-memory article store, print its NZB and fetch it back
//!
//! Run with: cargo run --example post_and_fetch [FILE]

use std::collections::HashMap;
use usenet_codec::{
    ArticleFetcher, ArticlePoster, CodecError, MessageId, NzbBuilder, PostingConfig, Result,
    download_file, post_file,
};

#[derive(Default)]
struct MemoryStore {
    articles: HashMap<MessageId, Vec<Vec<u8>>>,
}

impl ArticlePoster for MemoryStore {
    fn post_article(&mut self, article: &[Vec<u8>]) -> Result<()> {
        let split = article.iter().position(Vec::is_empty).unwrap_or(0);
        let id = article[..split]
            .iter()
            .find_map(|l| l.strip_prefix(b"Message-ID: "))
            .map(|v| MessageId::new(String::from_utf8_lossy(v)))
            .ok_or_else(|| CodecError::Transport("article without Message-ID".to_string()))?;
        self.articles.insert(id, article[split + 1..].to_vec());
        Ok(())
    }
}

impl ArticleFetcher for MemoryStore {
    type Body = Vec<Vec<u8>>;

    fn fetch_article_body(&mut self, message_id: &MessageId) -> Result<Self::Body> {
        self.articles
            .get(message_id)
            .cloned()
            .ok_or_else(|| CodecError::Transport(format!("430 no such article {}", message_id)))
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let (name, data) = match std::env::args().nth(1) {
        Some(path) => {
            let data = std::fs::read(&path)?;
            (path, data)
        }
        None => ("demo.bin".to_string(), (0..=255u8).cycle().take(100_000).collect()),
    };

    let config = PostingConfig::new("demo@example.com", ["alt.binaries.test"])
        .with_part_size(32_000)
        .with_message_base("example.com");

    let mut store = MemoryStore::default();
    let file = post_file(&mut store, &config, &name, &data)?;
    println!("Posted {} in {} articles", name, file.segments().len());

    let nzb = NzbBuilder::new()
        .add_meta("title", name.as_str())
        .add_file(file.clone())
        .build()?;
    println!("{}", nzb.to_xml()?);

    let downloaded = download_file(&mut store, &file)?;
    println!(
        "Fetched {} bytes, {}",
        downloaded.data.len(),
        if downloaded.data == data && downloaded.is_valid() {
            "identical"
        } else {
            "DIFFERENT"
        }
    );

    Ok(())
}
