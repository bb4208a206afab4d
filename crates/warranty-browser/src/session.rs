use crate::ProfileDir;
use crate::error::from_cdp;
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use std::sync::Arc;
use tokio::task::JoinHandle;
use warranty_core::{BrowserSession, Condition, Error, Locator, Result};

/// Returns true when the element has a rendered, non-hidden box
const IS_VISIBLE_JS: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
}"#;

/// Visible and not disabled
const IS_CLICKABLE_JS: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none'
        && !this.disabled;
}"#;

const CLEAR_JS: &str = r#"function() {
    this.value = '';
    this.dispatchEvent(new Event('input', { bubbles: true }));
}"#;

const ACTIVATE_JS: &str = "function() { this.click(); }";

/// Handle to a DOM element in a [`ChromeSession`]
#[derive(Clone)]
pub struct ChromeElement(Arc<Element>);

impl ChromeElement {
    fn new(element: Element) -> Self {
        Self(Arc::new(element))
    }
}

/// A running Chrome instance with one page, driven over CDP
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    /// Root of the entered embedded context; `None` is the top-level document.
    /// Lookups are scoped to this element's subtree, which covers overlay
    /// containers rendered in the page's own DOM. An `<iframe>` root would not
    /// expose its document this way.
    frame: Option<ChromeElement>,
    _profile: ProfileDir,
}

impl ChromeSession {
    pub(crate) fn new(
        browser: Browser,
        page: Page,
        handler_task: JoinHandle<()>,
        profile: ProfileDir,
    ) -> Self {
        Self {
            browser,
            page,
            handler_task,
            frame: None,
            _profile: profile,
        }
    }

    /// All elements matching `locator` under the current context
    async fn query_all(&mut self, locator: &Locator) -> Result<Vec<Element>> {
        let selector = css_selector(locator);
        let found = match &self.frame {
            Some(root) => root.0.find_elements(selector.as_str()).await,
            None => self.page.find_elements(selector.as_str()).await,
        };

        let elements = match found {
            Ok(elements) => elements,
            Err(e) => {
                let err = from_cdp(e, &selector);
                return if err.is_session_loss() { Err(err) } else { Ok(Vec::new()) };
            }
        };

        let Locator::ButtonText(phrases) = locator else {
            return Ok(elements);
        };

        let mut matching = Vec::new();
        for element in elements {
            let text = match element.inner_text().await {
                Ok(text) => text.unwrap_or_default(),
                Err(e) => {
                    let err = from_cdp(e, "button text");
                    if err.is_session_loss() {
                        return Err(err);
                    }
                    continue;
                }
            };
            if phrases.iter().any(|phrase| text.contains(phrase)) {
                matching.push(element);
            }
        }
        Ok(matching)
    }
}

async fn satisfies(element: &Element, condition: Condition) -> Result<bool> {
    let script = match condition {
        Condition::Present => return Ok(true),
        Condition::Visible => IS_VISIBLE_JS,
        Condition::Clickable => IS_CLICKABLE_JS,
    };

    let returns = element
        .call_js_fn(script, false)
        .await
        .map_err(|e| from_cdp(e, "element state"))?;

    Ok(returns
        .result
        .value
        .and_then(|v| v.as_bool())
        .unwrap_or(false))
}

fn css_selector(locator: &Locator) -> String {
    match locator {
        Locator::Id(id) => format!("#{}", id),
        Locator::Css(selector) => selector.to_string(),
        Locator::ButtonText(_) => "button".to_string(),
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Element = ChromeElement;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.frame = None;
        self.page
            .goto(url)
            .await
            .map_err(|e| from_cdp(e, &format!("navigate to {}", url)))?;
        Ok(())
    }

    async fn probe(
        &mut self,
        locator: &Locator,
        condition: Condition,
    ) -> Result<Option<ChromeElement>> {
        for element in self.query_all(locator).await? {
            match satisfies(&element, condition).await {
                Ok(true) => return Ok(Some(ChromeElement::new(element))),
                Ok(false) => {}
                Err(e) if e.is_session_loss() => return Err(e),
                Err(e) => tracing::trace!("Skipping candidate for {}: {}", locator, e),
            }
        }
        Ok(None)
    }

    async fn find_child(
        &mut self,
        parent: &ChromeElement,
        locator: &Locator,
    ) -> Result<ChromeElement> {
        self.find_children(parent, locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(locator.to_string()))
    }

    async fn find_children(
        &mut self,
        parent: &ChromeElement,
        locator: &Locator,
    ) -> Result<Vec<ChromeElement>> {
        let selector = css_selector(locator);
        let children = parent
            .0
            .find_elements(selector.as_str())
            .await
            .map_err(|e| from_cdp(e, &selector))?;
        Ok(children.into_iter().map(ChromeElement::new).collect())
    }

    async fn clear(&mut self, element: &ChromeElement) -> Result<()> {
        element
            .0
            .call_js_fn(CLEAR_JS, false)
            .await
            .map_err(|e| from_cdp(e, "clear input"))?;
        Ok(())
    }

    async fn type_text(&mut self, element: &ChromeElement, text: &str) -> Result<()> {
        element
            .0
            .focus()
            .await
            .map_err(|e| from_cdp(e, "focus input"))?;
        element
            .0
            .type_str(text)
            .await
            .map_err(|e| from_cdp(e, "type into input"))?;
        Ok(())
    }

    async fn click(&mut self, element: &ChromeElement) -> Result<()> {
        element
            .0
            .click()
            .await
            .map_err(|e| from_cdp(e, "click"))?;
        Ok(())
    }

    async fn js_click(&mut self, element: &ChromeElement) -> Result<()> {
        element
            .0
            .call_js_fn(ACTIVATE_JS, false)
            .await
            .map_err(|e| from_cdp(e, "activate element"))?;
        Ok(())
    }

    async fn text(&mut self, element: &ChromeElement) -> Result<String> {
        let text = element
            .0
            .inner_text()
            .await
            .map_err(|e| from_cdp(e, "read text"))?;
        Ok(text.unwrap_or_default())
    }

    fn enter_frame(&mut self, frame: &ChromeElement) -> Result<()> {
        self.frame = Some(frame.clone());
        Ok(())
    }

    fn leave_frame(&mut self) -> Result<()> {
        self.frame = None;
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Closing Chrome");
        self.frame = None;

        let closed = self.browser.close().await;
        if closed.is_ok() {
            if let Err(e) = self.browser.wait().await {
                tracing::debug!("Waiting for Chrome to exit failed: {}", e);
            }
        }
        self.handler_task.abort();

        closed
            .map(|_| ())
            .map_err(|e| from_cdp(e, "close browser"))
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_selector_for_locators() {
        assert_eq!(css_selector(&Locator::Id("FindMyProduct")), "#FindMyProduct");
        assert_eq!(
            css_selector(&Locator::Css("input[formcontrolname='productNumber']")),
            "input[formcontrolname='productNumber']"
        );
        assert_eq!(css_selector(&Locator::ButtonText(&["Accept"])), "button");
    }

    // Driving a real page requires a running Chrome instance; the workflow
    // itself is covered against a scripted session in warranty-lookup.
}
