//! Element locators of the vendor's warranty-check page.

use warranty_core::Locator;

/// Affirmative consent-button phrasings (English and German)
pub const CONSENT_PHRASES: &[&str] = &[
    "Accept",
    "Alle Cookies akzeptieren",
    "Accept All",
    "Ich stimme zu",
];

pub const CONSENT_BUTTON: Locator = Locator::ButtonText(CONSENT_PHRASES);
pub const CONSENT_CONTAINER: Locator = Locator::Id("onetrust-pc-sdk");
pub const CONSENT_ACCEPT: Locator = Locator::Id("onetrust-accept-btn-handler");

pub const SERIAL_INPUT: Locator = Locator::Id("inputtextpfinder");
pub const SERIAL_SUBMIT: Locator = Locator::Id("FindMyProduct");

pub const MODEL_INPUT: Locator = Locator::Css("input[formcontrolname='productNumber']");
pub const MODEL_SUBMIT: Locator = Locator::Id("FindMyProductNumber");

pub const INFO_SECTION: Locator = Locator::Css("div.info-section");
pub const INFO_ITEM: Locator = Locator::Css("div.info-item");
pub const INFO_LABEL: Locator = Locator::Css("div.label");
pub const INFO_TEXT: Locator = Locator::Css("div.text");
pub const PARAGRAPH: Locator = Locator::Css("p");
