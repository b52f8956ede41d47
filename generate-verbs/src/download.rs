use anyhow::Context as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

const USER_AGENT: &str = "VerbBot/1.0 (verb dataset builder) reqwest/0.12";

pub fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

pub async fn fetch_text(client: &reqwest::Client, url: &str) -> anyhow::Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {url}"))?
        .error_for_status()
        .with_context(|| format!("Bad status from {url}"))?;
    response
        .text()
        .await
        .with_context(|| format!("Failed to read response text from {url}"))
}

/// Downloads `url` to `dest` unless the file is already there.
///
/// The body is streamed to a temporary file next to `dest` and renamed into
/// place once complete, so an interrupted download never leaves a truncated
/// file that a later run would pick up.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    refresh: bool,
) -> anyhow::Result<PathBuf> {
    if dest.exists() && !refresh {
        println!("{} already exists, skipping download", dest.display());
        return Ok(dest.to_path_buf());
    }

    let dir = parent_dir(dest);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {url}"))?
        .error_for_status()
        .with_context(|| format!("Bad status from {url}"))?;

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .context("Failed to create temporary download file")?;
    let mut bytes = 0usize;
    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("Failed while downloading {url}"))?
    {
        bytes += chunk.len();
        file.write_all(&chunk)?;
    }
    file.persist(dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;

    log::info!("Downloaded {bytes} bytes from {url} to {}", dest.display());
    Ok(dest.to_path_buf())
}

/// Fetches a text resource, keeping a copy at `cache_file` for later runs.
pub async fn fetch_text_cached(
    client: &reqwest::Client,
    url: &str,
    cache_file: &Path,
    refresh: bool,
) -> anyhow::Result<String> {
    let path = download_file(client, url, cache_file, refresh).await?;
    std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))
}

pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
