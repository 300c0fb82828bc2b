//! Fire-and-forget changes to the host document: root classes, root
//! attributes, and object URL lifetimes.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::i18n::Locale;

pub const DARK_CLASS: &str = "dark";
pub const RTL_CLASS: &str = "rtl";

pub struct Document<Ev> {
    context: CapabilityContext<DocumentOperation, Ev>,
}

impl<Ev> Capability<Ev> for Document<Ev> {
    type Operation = DocumentOperation;
    type MappedSelf<MappedEv> = Document<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Document::new(self.context.map_event(f))
    }
}

impl<Ev> Document<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<DocumentOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn set_dark_mode(&self, enabled: bool) {
        self.notify(vec![DocumentOperation::SetRootClass {
            class: DARK_CLASS.to_string(),
            enabled,
        }]);
    }

    /// Applies `dir`, `lang` and the `rtl` class for `locale`.
    pub fn apply_locale(&self, locale: Locale) {
        self.notify(vec![
            DocumentOperation::SetRootAttribute {
                name: "dir".to_string(),
                value: locale.direction().as_str().to_string(),
            },
            DocumentOperation::SetRootAttribute {
                name: "lang".to_string(),
                value: locale.code().to_string(),
            },
            DocumentOperation::SetRootClass {
                class: RTL_CLASS.to_string(),
                enabled: locale.is_rtl(),
            },
        ]);
    }

    pub fn revoke_object_url(&self, url: impl Into<String>) {
        self.notify(vec![DocumentOperation::RevokeObjectUrl { url: url.into() }]);
    }

    fn notify(&self, operations: Vec<DocumentOperation>) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            for operation in operations {
                ctx.notify_shell(operation).await;
            }
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentOperation {
    SetRootClass { class: String, enabled: bool },
    SetRootAttribute { name: String, value: String },
    RevokeObjectUrl { url: String },
}

impl Operation for DocumentOperation {
    type Output = ();
}
