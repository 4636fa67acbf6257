// src/integrations/rotten_tomatoes/mod.rs
//
// Rotten Tomatoes - client-rendered SPA source. Reviews come from four
// listing endpoints whose overlap is resolved by the priority merge.

pub mod client;
pub mod extract;

pub use client::{RottenTomatoesConfig, RottenTomatoesScraper};

#[cfg(test)]
pub(crate) mod test_support {
    // Hand-rolled fakes for the browser port. A FakeElement is a little
    // tree keyed by the exact selector strings the extractor uses; a
    // FakeSession serves per-URL pages whose content can change across
    // scroll stages.

    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::error::{AppError, AppResult};
    use crate::integrations::ports::{BrowserDriver, BrowserSession, ElementNode};

    #[derive(Clone, Default)]
    pub struct FakeElement {
        pub text: String,
        pub attrs: HashMap<String, String>,
        pub children: HashMap<String, Vec<FakeElement>>,
    }

    impl FakeElement {
        pub fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                ..Default::default()
            }
        }

        pub fn with_attr(mut self, name: &str, value: &str) -> Self {
            self.attrs.insert(name.to_string(), value.to_string());
            self
        }

        pub fn with_child(mut self, selector: &str, child: FakeElement) -> Self {
            self.children.entry(selector.to_string()).or_default().push(child);
            self
        }
    }

    impl ElementNode for FakeElement {
        fn text(&self) -> String {
            self.text.clone()
        }

        fn attr(&self, name: &str) -> Option<String> {
            self.attrs.get(name).cloned()
        }

        fn find(&self, selector: &str) -> Option<Box<dyn ElementNode>> {
            self.children
                .get(selector)
                .and_then(|list| list.first())
                .map(|el| Box::new(el.clone()) as Box<dyn ElementNode>)
        }

        fn find_all(&self, selector: &str) -> Vec<Box<dyn ElementNode>> {
            self.children
                .get(selector)
                .map(|list| {
                    list.iter()
                        .map(|el| Box::new(el.clone()) as Box<dyn ElementNode>)
                        .collect()
                })
                .unwrap_or_default()
        }
    }

    /// Build a review-card element the way the SPA nests its slots.
    pub fn review_card(
        body: &str,
        author: Option<&str>,
        timestamp: Option<&str>,
    ) -> FakeElement {
        let drawer = FakeElement::new(body)
            .with_child(r#"span[slot="content"]"#, FakeElement::new(body));
        let mut card =
            FakeElement::new("").with_child(r#"drawer-more[slot="review"]"#, drawer);
        if let Some(author) = author {
            card = card.with_child(r#"rt-link[slot="name"]"#, FakeElement::new(author));
        }
        if let Some(timestamp) = timestamp {
            card = card.with_child(r#"span[slot="timestamp"]"#, FakeElement::new(timestamp));
        }
        card
    }

    /// One URL's worth of fake page content. `stages` holds the selector
    /// map after each scroll (index clamped to the last entry).
    #[derive(Clone, Default)]
    pub struct FakePage {
        pub title: String,
        pub stages: Vec<HashMap<String, Vec<FakeElement>>>,
        pub heights: Vec<u64>,
    }

    impl FakePage {
        pub fn with_elements(selector: &str, elements: Vec<FakeElement>) -> Self {
            let mut stage = HashMap::new();
            stage.insert(selector.to_string(), elements);
            Self {
                title: String::new(),
                stages: vec![stage],
                heights: vec![1000],
            }
        }

        /// Add another selector's elements to the first stage.
        pub fn and_elements(mut self, selector: &str, elements: Vec<FakeElement>) -> Self {
            if let Some(stage) = self.stages.first_mut() {
                stage.insert(selector.to_string(), elements);
            }
            self
        }

        pub fn empty() -> Self {
            Self {
                title: String::new(),
                stages: vec![HashMap::new()],
                heights: vec![1000],
            }
        }
    }

    pub struct FakeSession {
        pages: HashMap<String, FakePage>,
        current_url: String,
        scroll_stage: usize,
        fail_navigation_containing: Option<String>,
        close_count: Arc<AtomicUsize>,
    }

    impl FakeSession {
        fn current_page(&self) -> Option<&FakePage> {
            // Most specific (longest) URL fragment wins
            self.pages
                .iter()
                .filter(|(url, _)| self.current_url.contains(*url))
                .max_by_key(|(url, _)| url.len())
                .map(|(_, page)| page)
        }

        fn stage_index(&self, len: usize) -> usize {
            self.scroll_stage.min(len.saturating_sub(1))
        }
    }

    #[async_trait]
    impl BrowserSession for FakeSession {
        async fn navigate(&mut self, url: &str) -> AppResult<()> {
            if let Some(marker) = &self.fail_navigation_containing {
                if url.contains(marker.as_str()) {
                    return Err(AppError::Transport("navigation failed".to_string()));
                }
            }
            self.current_url = url.to_string();
            self.scroll_stage = 0;
            Ok(())
        }

        async fn wait_for(&mut self, selector: &str, _timeout: Duration) -> AppResult<bool> {
            Ok(self
                .current_page()
                .map(|page| {
                    let idx = self.stage_index(page.stages.len());
                    page.stages
                        .get(idx)
                        .and_then(|stage| stage.get(selector))
                        .map(|els| !els.is_empty())
                        .unwrap_or(false)
                })
                .unwrap_or(false))
        }

        async fn query(&mut self, selector: &str) -> AppResult<Vec<Box<dyn ElementNode>>> {
            Ok(self
                .current_page()
                .and_then(|page| {
                    let idx = self.stage_index(page.stages.len());
                    page.stages.get(idx).and_then(|stage| stage.get(selector))
                })
                .map(|els| {
                    els.iter()
                        .map(|el| Box::new(el.clone()) as Box<dyn ElementNode>)
                        .collect()
                })
                .unwrap_or_default())
        }

        async fn scroll_to_bottom(&mut self) -> AppResult<()> {
            self.scroll_stage += 1;
            Ok(())
        }

        async fn page_height(&mut self) -> AppResult<u64> {
            Ok(self
                .current_page()
                .map(|page| {
                    let idx = self.stage_index(page.heights.len());
                    page.heights.get(idx).copied().unwrap_or(0)
                })
                .unwrap_or(0))
        }

        async fn page_title(&mut self) -> AppResult<String> {
            Ok(self
                .current_page()
                .map(|page| page.title.clone())
                .unwrap_or_default())
        }

        async fn close(&mut self) -> AppResult<()> {
            self.close_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct FakeDriver {
        pages: HashMap<String, FakePage>,
        fail_navigation_containing: Option<String>,
        fail_first_opens: usize,
        pub open_count: Arc<AtomicUsize>,
        pub close_count: Arc<AtomicUsize>,
    }

    impl FakeDriver {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve `page` for any navigated URL containing `url_part`.
        pub fn with_page(mut self, url_part: &str, page: FakePage) -> Self {
            self.pages.insert(url_part.to_string(), page);
            self
        }

        pub fn failing_navigation_containing(mut self, marker: &str) -> Self {
            self.fail_navigation_containing = Some(marker.to_string());
            self
        }

        pub fn failing_first_opens(mut self, count: usize) -> Self {
            self.fail_first_opens = count;
            self
        }

        pub fn opens(&self) -> usize {
            self.open_count.load(Ordering::SeqCst)
        }

        pub fn closes(&self) -> usize {
            self.close_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BrowserDriver for FakeDriver {
        async fn open_session(&self) -> AppResult<Box<dyn BrowserSession>> {
            let opened = self.open_count.fetch_add(1, Ordering::SeqCst);
            if opened < self.fail_first_opens {
                return Err(AppError::ResourceInit("driver refused to start".to_string()));
            }
            Ok(Box::new(FakeSession {
                pages: self.pages.clone(),
                current_url: String::new(),
                scroll_stage: 0,
                fail_navigation_containing: self.fail_navigation_containing.clone(),
                close_count: Arc::clone(&self.close_count),
            }))
        }
    }
}
