use super::{Page, PageContext, PageId};
use crate::Locator;

#[derive(Debug, Clone)]
pub struct TestCasesPage {
    ctx: PageContext,
}

impl TestCasesPage {
    pub const TITLE: Locator = Locator::xpath("//b[normalize-space()='Test Cases']");

    pub async fn is_test_cases_visible(&self) -> bool {
        self.is_open().await
    }
}

impl Page for TestCasesPage {
    const ID: PageId = PageId::TestCases;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::TITLE
    }
}
