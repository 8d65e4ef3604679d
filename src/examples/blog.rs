//! Blog Example
//!
//! Creates an index, stores a couple of posts, searches them and cleans up.
//! Needs a search server on 127.0.0.1:9200.
//!
//! Run with: cargo run --example blog

use elastical_rs::{
    Client, CreateIndexOptions, DeleteOptions, GetOptions, IndexOptions, SearchOptions,
};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Client::new();
    println!("Using {}\n", client.base_url());

    if client.index_exists("blog").await?.result {
        client.delete_index("blog").await?;
    }

    let options = CreateIndexOptions {
        settings: Some(json!({ "number_of_shards": 1 })),
        ..Default::default()
    };
    client.create_index("blog", &options).await?;
    println!("Created index 'blog'");

    let blog = client.get_index("blog");
    for (id, title) in [("1", "Hello world"), ("2", "Second post")] {
        let options = IndexOptions {
            id: Some(id.to_string()),
            refresh: Some(true),
            ..Default::default()
        };
        blog.set("post", &json!({ "title": title }), &options).await?;
        println!("Indexed post {}", id);
    }

    let post = blog.get("1", &GetOptions::default()).await?.result;
    println!("\nPost 1: {}", post.source.unwrap_or_default());

    let results = blog.search(&SearchOptions::query("hello")).await?.result;
    println!("\nSearch results for 'hello' ({} total):", results.total);
    for (i, hit) in results.hits.iter().enumerate() {
        println!("   {}. {} (score: {:.4})", i + 1, hit.id, hit.score.unwrap_or_default());
    }

    let options = DeleteOptions {
        ignore_missing: true,
        ..Default::default()
    };
    blog.delete("post", "3", &options).await?;
    client.delete_index("blog").await?;
    println!("\nDeleted index 'blog'");

    Ok(())
}
