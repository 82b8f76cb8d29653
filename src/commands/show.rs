//! Show a single resolved post

use anyhow::Result;

use crate::content::BlogPost;
use crate::Blog;

/// Resolve `slug` and print it; an unknown or unreadable post is an error
pub async fn run(blog: &Blog, slug: &str) -> Result<()> {
    let resolver = blog.resolver()?;

    let Some(post) = resolver.get_post(slug).await else {
        anyhow::bail!("Post not found: {}", slug);
    };

    let related = resolver
        .related_posts(&post, blog.config.related_posts)
        .await;
    let styles = post
        .has_custom_styles
        .then(|| resolver.styles_url(&post.slug));

    print!("{}", format_post(&post, styles.as_deref(), &related));
    Ok(())
}

/// Text rendering of a post for the terminal
fn format_post(post: &BlogPost, styles: Option<&str>, related: &[BlogPost]) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", post.title));
    out.push_str(&format!(
        "{} · {} · {}\n",
        post.display_date(),
        post.read_time,
        post.author
    ));
    if !post.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", post.tags.join(", ")));
    }
    if !post.summary.is_empty() {
        out.push_str(&format!("\n{}\n", post.summary));
    }
    if let Some(url) = styles {
        out.push_str(&format!("Stylesheet: {}\n", url));
    }

    out.push_str("\n---\n\n");
    out.push_str(&post.content);
    out.push('\n');

    if !related.is_empty() {
        out.push_str("\nRelated:\n");
        for p in related {
            out.push_str(&format!("  {} [{}]\n", p.title, p.slug));
        }
    }

    out
}
