use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "hoops_terminal";
const CACHE_FILE: &str = "http_cache.json";

static CACHE: Mutex<Option<HttpCacheFile>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HttpCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

impl CacheEntry {
    fn is_fresh(&self, max_age: Duration, now: u64) -> bool {
        now.saturating_sub(self.fetched_at) < max_age.as_secs()
    }
}

/// GET `url`, answering from the disk cache while the entry is younger than
/// `max_age` and revalidating with ETag / Last-Modified after that.
pub fn fetch_json_cached(
    client: &Client,
    url: &str,
    extra_headers: &[(&str, &str)],
    max_age: Duration,
) -> Result<String> {
    let cached_entry = {
        let mut guard = CACHE.lock().expect("http cache lock poisoned");
        let cache = guard.get_or_insert_with(load_cache_file);
        cache.entries.get(url).cloned()
    };

    let now = system_time_to_secs(SystemTime::now()).unwrap_or_default();
    if let Some(entry) = cached_entry.as_ref()
        && entry.is_fresh(max_age, now)
    {
        return Ok(entry.body.clone());
    }

    let mut req = client.get(url);
    for (name, value) in extra_headers {
        req = req.header(*name, *value);
    }
    if let Some(entry) = cached_entry.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().with_context(|| format!("request failed: {url}"))?;
    let status = resp.status();
    let headers = resp.headers().clone();
    if status == StatusCode::NOT_MODIFIED {
        if let Some(mut entry) = cached_entry {
            entry.fetched_at = now;
            let body = entry.body.clone();
            store_entry(url, entry);
            return Ok(body);
        }
        return Err(anyhow::anyhow!("received 304 without cache body"));
    }

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, truncate(&body, 200)));
    }

    let header_string = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    let entry = CacheEntry {
        body: body.clone(),
        etag: header_string(ETAG),
        last_modified: header_string(LAST_MODIFIED),
        fetched_at: now,
    };
    store_entry(url, entry);
    Ok(body)
}

fn store_entry(key: &str, entry: CacheEntry) {
    let mut guard = CACHE.lock().expect("http cache lock poisoned");
    let cache = guard.get_or_insert_with(load_cache_file);
    cache.version = CACHE_VERSION;
    cache.entries.insert(key.to_string(), entry);
    let _ = save_cache_file(cache);
}

fn load_cache_file() -> HttpCacheFile {
    let Some(path) = cache_path() else {
        return HttpCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return HttpCacheFile::default();
    };
    let cache = serde_json::from_str::<HttpCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return HttpCacheFile::default();
    }
    cache
}

fn save_cache_file(cache: &HttpCacheFile) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    let Some(dir) = path.parent() else {
        return Ok(());
    };
    fs::create_dir_all(dir).ok();
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize http cache")?;
    fs::write(&tmp, json).context("write http cache")?;
    fs::rename(&tmp, &path).context("swap http cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}

/// `$HOOPS_CACHE_DIR`, else `$XDG_CACHE_HOME/hoops_terminal`, else `~/.cache/hoops_terminal`.
pub fn app_cache_dir() -> Option<PathBuf> {
    let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
    if let Some(dir) = non_empty("HOOPS_CACHE_DIR") {
        return Some(PathBuf::from(dir));
    }
    if let Some(base) = non_empty("XDG_CACHE_HOME") {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = non_empty("HOME")?;
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

fn truncate(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freshness_uses_max_age() {
        let entry = CacheEntry {
            body: "{}".to_string(),
            etag: None,
            last_modified: None,
            fetched_at: 1_000,
        };
        assert!(entry.is_fresh(Duration::from_secs(600), 1_500));
        assert!(!entry.is_fresh(Duration::from_secs(600), 1_600));
        assert!(!entry.is_fresh(Duration::ZERO, 1_000));
    }
}
