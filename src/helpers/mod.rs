pub mod fzf_invoker;

use self::fzf_invoker::FzfInvoker;
use anyhow::Result;
use anyhow::bail;

/// Wrapper around the `termenu` picker that keeps the prompts consistent.
/// Items are converted into `String`s so callers keep ownership.
pub fn choose_one<S: ToString>(title: &str, items: Vec<S>) -> Result<String> {
    let display_items: Vec<String> = items.into_iter().map(|s| s.to_string()).collect();
    let picker = FzfInvoker::new(title.to_string(), display_items);
    match picker.invoke()? {
        Some(choice) => Ok(choice),
        None => bail!("No selection made"),
    }
}

/// Architectures published in the Ubuntu catalogs.
pub fn arch_options() -> Vec<&'static str> {
    vec!["amd64", "arm64", "armhf", "i386", "ppc64el", "s390x"]
}

/// Streams offered by the prompt; the first one is the default.
pub fn stream_options() -> Vec<&'static str> {
    vec!["released", "daily"]
}
