// src/browser/webdriver.rs
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tokio::runtime::Handle;

use super::{Browser, BrowserError};
use crate::config::options::WebDriverOptions;

/// `thirtyfour` session driven synchronously through a Tokio runtime handle.
pub struct WebDriverBrowser {
    rt: Handle,
    driver: Option<WebDriver>,
}

fn driver_err(e: WebDriverError) -> BrowserError {
    BrowserError::Driver(e.to_string())
}

impl WebDriverBrowser {
    /// Open a Chrome session on the WebDriver server named in `opts`.
    /// `rt` must belong to a multi-thread runtime; calls are made with `block_on`.
    pub fn connect(rt: Handle, opts: &WebDriverOptions) -> Result<Self, BrowserError> {
        let mut caps = DesiredCapabilities::chrome();
        for arg in opts.chrome_args() {
            if let Err(e) = caps.add_arg(&arg) {
                logw!("Chrome arg '{}' rejected: {}", arg, e);
            }
        }

        logd!("WebDriver: connecting to {}", opts.server_url);
        let driver = rt
            .block_on(WebDriver::new(&opts.server_url, caps))
            .map_err(driver_err)?;

        Ok(Self { rt, driver: Some(driver) })
    }

    fn driver(&self) -> Result<&WebDriver, BrowserError> {
        self.driver
            .as_ref()
            .ok_or_else(|| BrowserError::Driver(s!("session already closed")))
    }

    fn find_all(&self, selector: &str) -> Result<Vec<WebElement>, BrowserError> {
        let driver = self.driver()?;
        self.rt
            .block_on(driver.find_all(By::Css(selector)))
            .map_err(driver_err)
    }

    fn first(&self, selector: &str) -> Result<WebElement, BrowserError> {
        self.find_all(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::NotFound(s!(selector)))
    }
}

impl Browser for WebDriverBrowser {
    fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        let driver = self.driver()?;
        self.rt.block_on(driver.goto(url)).map_err(driver_err)
    }

    fn exists(&mut self, selector: &str) -> Result<bool, BrowserError> {
        Ok(!self.find_all(selector)?.is_empty())
    }

    fn attr(&mut self, selector: &str, name: &str) -> Result<Option<String>, BrowserError> {
        let el = self.first(selector)?;
        self.rt.block_on(el.attr(name)).map_err(driver_err)
    }

    fn text(&mut self, selector: &str) -> Result<String, BrowserError> {
        let el = self.first(selector)?;
        self.rt.block_on(el.text()).map_err(driver_err)
    }

    fn quit(&mut self) -> Result<(), BrowserError> {
        match self.driver.take() {
            Some(driver) => self.rt.block_on(driver.quit()).map_err(driver_err),
            None => Ok(()),
        }
    }
}

impl Drop for WebDriverBrowser {
    fn drop(&mut self) {
        if self.driver.is_some() {
            if let Err(e) = self.quit() {
                logw!("WebDriver: quit on drop failed: {}", e);
            }
        }
    }
}
