//! Scripted stand-in for the vendor site and the browser driving it.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use warranty_core::store::Checkpoint;
use warranty_core::{
    BrowserSession, Condition, Config, Error, Locator, ResultDataset, Result, SessionLauncher,
    Timeouts,
};
use warranty_lookup::site;

/// How the cookie banner is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Absent,
    Direct,
    Overlay,
}

/// One `div.info-item`; `None` leaves out the label or value element
#[derive(Debug, Clone)]
pub struct Item {
    pub label: Option<&'static str>,
    pub paragraphs: Vec<&'static str>,
    pub text: Option<&'static str>,
}

impl Item {
    pub fn text(label: &'static str, text: &'static str) -> Self {
        Self {
            label: Some(label),
            paragraphs: Vec::new(),
            text: Some(text),
        }
    }

    pub fn paragraphs(label: &'static str, paragraphs: Vec<&'static str>) -> Self {
        Self {
            label: Some(label),
            paragraphs,
            text: Some(""),
        }
    }
}

/// A page fault the scripted site can inject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    /// The page load never finishes
    SlowPage,
    /// The serial form never renders
    NoSerialForm,
    /// Activating the serial submit button throws
    SubmitBroken,
    /// Querying the model prompt throws instead of answering
    DetectionBroken,
    /// The results panel has no enumerable info items
    ItemsMissing,
    /// Enumerating the info items times out
    ItemsTimeout,
}

/// Behaviour of the site for one serial number
#[derive(Debug, Clone)]
pub struct Script {
    pub consent: Consent,
    pub requires_model: bool,
    pub panel_visible: bool,
    pub items: Vec<Item>,
    /// Browser dies when this serial is typed
    pub kills_session: bool,
    pub fault: Fault,
}

impl Script {
    pub fn warranty(status: &'static str, start: &'static str, end: &'static str) -> Self {
        Self {
            consent: Consent::Absent,
            requires_model: false,
            panel_visible: true,
            items: vec![
                Item::text("Status", status),
                Item::text("Start date", start),
                Item::text("End date", end),
            ],
            kills_session: false,
            fault: Fault::None,
        }
    }

    pub fn in_warranty() -> Self {
        Self::warranty("In Warranty", "2022-01-01", "2025-01-01")
    }
}

/// What the fake browser was asked to do, across all sessions
#[derive(Debug, Default)]
pub struct Journal {
    pub launches: usize,
    pub shutdowns: usize,
    pub navigations: usize,
    pub serials_typed: Vec<String>,
    pub models_typed: Vec<String>,
    pub consent_clicks: usize,
    pub frame_exits: usize,
    pub in_frame_after_consent: Vec<bool>,
}

pub struct Site {
    default: Script,
    per_serial: HashMap<String, Script>,
    pub journal: Mutex<Journal>,
}

impl Site {
    pub fn new(default: Script) -> Arc<Self> {
        Self::with_serials(default, Vec::new())
    }

    pub fn with_serials(default: Script, per_serial: Vec<(&str, Script)>) -> Arc<Self> {
        Arc::new(Self {
            default,
            per_serial: per_serial
                .into_iter()
                .map(|(serial, script)| (serial.to_string(), script))
                .collect(),
            journal: Mutex::new(Journal::default()),
        })
    }

    fn script_for(&self, serial: &str) -> Script {
        self.per_serial
            .get(serial)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn journal(&self) -> std::sync::MutexGuard<'_, Journal> {
        self.journal.lock().unwrap()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Blank,
    Form,
    ModelPrompt,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    ConsentButton,
    ConsentContainer,
    ConsentAccept,
    SerialInput,
    SerialSubmit,
    ModelInput,
    ModelSubmit,
    Panel,
    Item(usize),
    Label(usize),
    Value(usize),
    Paragraph(usize, usize),
}

pub struct FakeSession {
    site: Arc<Site>,
    script: Script,
    phase: Phase,
    in_frame: bool,
    consent_done: bool,
    lost: bool,
}

impl FakeSession {
    pub fn new(site: Arc<Site>) -> Self {
        let script = site.default.clone();
        Self {
            site,
            script,
            phase: Phase::Blank,
            in_frame: false,
            consent_done: false,
            lost: false,
        }
    }

    fn alive(&self) -> Result<()> {
        if self.lost {
            Err(Error::SessionLost("chrome not reachable".to_string()))
        } else {
            Ok(())
        }
    }

    fn item(&self, idx: usize) -> Result<&Item> {
        self.script
            .items
            .get(idx)
            .ok_or_else(|| Error::Stale(format!("info item {}", idx)))
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Element = Node;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.alive()?;
        self.phase = Phase::Form;
        self.in_frame = false;
        self.script = self.site.default.clone();
        self.site.journal().navigations += 1;
        if self.script.fault == Fault::SlowPage {
            return Err(Error::Timeout(format!("navigate to {}", url)));
        }
        Ok(())
    }

    async fn probe(&mut self, locator: &Locator, condition: Condition) -> Result<Option<Node>> {
        self.alive()?;
        let banner_up = !self.consent_done;
        let top = !self.in_frame;

        let node = match *locator {
            l if l == site::CONSENT_BUTTON => {
                (top && banner_up && self.script.consent == Consent::Direct).then_some(Node::ConsentButton)
            }
            l if l == site::CONSENT_CONTAINER => {
                (top && banner_up && self.script.consent == Consent::Overlay).then_some(Node::ConsentContainer)
            }
            l if l == site::CONSENT_ACCEPT => {
                (self.in_frame && banner_up && self.script.consent == Consent::Overlay).then_some(Node::ConsentAccept)
            }
            l if l == site::SERIAL_INPUT => {
                let rendered = self.script.fault != Fault::NoSerialForm;
                (top && rendered && self.phase == Phase::Form).then_some(Node::SerialInput)
            }
            l if l == site::SERIAL_SUBMIT => (top && self.phase == Phase::Form).then_some(Node::SerialSubmit),
            l if l == site::MODEL_INPUT => {
                if self.script.fault == Fault::DetectionBroken && self.phase != Phase::Form {
                    return Err(Error::Browser("Execution context was destroyed".to_string()));
                }
                (top && self.phase == Phase::ModelPrompt).then_some(Node::ModelInput)
            }
            l if l == site::MODEL_SUBMIT => (top && self.phase == Phase::ModelPrompt).then_some(Node::ModelSubmit),
            l if l == site::INFO_SECTION => {
                let shown = self.phase == Phase::Results
                    && (self.script.panel_visible || condition == Condition::Present);
                (top && shown).then_some(Node::Panel)
            }
            _ => None,
        };
        Ok(node)
    }

    async fn find_child(&mut self, parent: &Node, locator: &Locator) -> Result<Node> {
        self.alive()?;
        match (parent, *locator) {
            (Node::Item(i), l) if l == site::INFO_LABEL => match self.item(*i)?.label {
                Some(_) => Ok(Node::Label(*i)),
                None => Err(Error::NotFound(l.to_string())),
            },
            (Node::Item(i), l) if l == site::INFO_TEXT => match self.item(*i)?.text {
                Some(_) => Ok(Node::Value(*i)),
                None => Err(Error::NotFound(l.to_string())),
            },
            (_, l) => Err(Error::NotFound(l.to_string())),
        }
    }

    async fn find_children(&mut self, parent: &Node, locator: &Locator) -> Result<Vec<Node>> {
        self.alive()?;
        match (parent, *locator) {
            (Node::Panel, l) if l == site::INFO_ITEM => match self.script.fault {
                Fault::ItemsMissing => Err(Error::NotFound(l.to_string())),
                Fault::ItemsTimeout => Err(Error::Timeout(l.to_string())),
                _ => Ok((0..self.script.items.len()).map(Node::Item).collect()),
            },
            (Node::Value(i), l) if l == site::PARAGRAPH => {
                let count = self.item(*i)?.paragraphs.len();
                Ok((0..count).map(|j| Node::Paragraph(*i, j)).collect())
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn clear(&mut self, _element: &Node) -> Result<()> {
        self.alive()
    }

    async fn type_text(&mut self, element: &Node, text: &str) -> Result<()> {
        self.alive()?;
        match element {
            Node::SerialInput => {
                self.script = self.site.script_for(text);
                self.site.journal().serials_typed.push(text.to_string());
                if self.script.kills_session {
                    self.lost = true;
                    return Err(Error::SessionLost("chrome not reachable".to_string()));
                }
            }
            Node::ModelInput => self.site.journal().models_typed.push(text.to_string()),
            other => return Err(Error::Browser(format!("cannot type into {:?}", other))),
        }
        Ok(())
    }

    async fn click(&mut self, element: &Node) -> Result<()> {
        self.alive()?;
        match element {
            Node::ConsentButton | Node::ConsentAccept => {
                self.consent_done = true;
                let mut journal = self.site.journal();
                journal.consent_clicks += 1;
                journal.in_frame_after_consent.push(self.in_frame);
                Ok(())
            }
            other => Err(Error::Browser(format!("pointer click intercepted on {:?}", other))),
        }
    }

    async fn js_click(&mut self, element: &Node) -> Result<()> {
        self.alive()?;
        match element {
            Node::SerialSubmit if self.script.fault == Fault::SubmitBroken => {
                return Err(Error::Browser("submit handler threw".to_string()));
            }
            Node::SerialSubmit => {
                self.phase = if self.script.requires_model {
                    Phase::ModelPrompt
                } else {
                    Phase::Results
                };
            }
            Node::ModelSubmit => self.phase = Phase::Results,
            _ => {}
        }
        Ok(())
    }

    async fn text(&mut self, element: &Node) -> Result<String> {
        self.alive()?;
        let text = match element {
            Node::Label(i) => self.item(*i)?.label.unwrap_or_default(),
            Node::Value(i) => self.item(*i)?.text.unwrap_or_default(),
            Node::Paragraph(i, j) => self.item(*i)?.paragraphs.get(*j).copied().unwrap_or_default(),
            _ => "",
        };
        Ok(text.to_string())
    }

    fn enter_frame(&mut self, frame: &Node) -> Result<()> {
        self.alive()?;
        match frame {
            Node::ConsentContainer => {
                self.in_frame = true;
                Ok(())
            }
            other => Err(Error::Browser(format!("{:?} is not a frame", other))),
        }
    }

    fn leave_frame(&mut self) -> Result<()> {
        self.alive()?;
        if self.in_frame {
            self.site.journal().frame_exits += 1;
        }
        self.in_frame = false;
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.site.journal().shutdowns += 1;
        Ok(())
    }
}

/// Hands out fake sessions; launches numbered `fail_from` and later fail
pub struct FakeLauncher {
    site: Arc<Site>,
    fail_from: Option<usize>,
}

impl FakeLauncher {
    pub fn new(site: Arc<Site>) -> Self {
        Self {
            site,
            fail_from: None,
        }
    }

    pub fn failing_from(site: Arc<Site>, launch: usize) -> Self {
        Self {
            site,
            fail_from: Some(launch),
        }
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&mut self) -> Result<FakeSession> {
        let attempt = {
            let mut journal = self.site.journal();
            journal.launches += 1;
            journal.launches
        };
        if self.fail_from.is_some_and(|n| attempt >= n) {
            return Err(Error::BrowserUnavailable("Chrome not found".to_string()));
        }
        Ok(FakeSession::new(self.site.clone()))
    }
}

/// Keeps a copy of every saved dataset
#[derive(Clone, Default)]
pub struct Snapshots {
    pub saved: Arc<Mutex<Vec<ResultDataset>>>,
}

impl Snapshots {
    pub fn all(&self) -> Vec<ResultDataset> {
        self.saved.lock().unwrap().clone()
    }
}

impl Checkpoint for Snapshots {
    fn save(&mut self, dataset: &ResultDataset) -> Result<()> {
        self.saved.lock().unwrap().push(dataset.clone());
        Ok(())
    }
}

/// Default configuration with waits short enough for tests
pub fn fast_config() -> Config {
    Config {
        timeouts: Timeouts {
            consent: Duration::from_millis(20),
            page: Duration::from_millis(60),
            detection: Duration::from_millis(60),
            poll: Duration::from_millis(2),
        },
        ..Config::default()
    }
}
