use crate::engine::{MessageContext, MessageInterpolator};
use crate::locale::Locale;
use std::sync::Arc;

/// Interpolator that forces a locale onto a delegate.
///
/// [`interpolate`](MessageInterpolator::interpolate) renders with the
/// configured locale; [`interpolate_for_locale`](MessageInterpolator::interpolate_for_locale)
/// passes the caller's locale through unchanged. Rendering itself is always
/// done by the delegate.
pub struct LocaleDelegatingInterpolator {
    delegate: Arc<dyn MessageInterpolator>,
    locale: Option<Locale>,
}

impl LocaleDelegatingInterpolator {
    pub fn new(delegate: Arc<dyn MessageInterpolator>) -> Self {
        Self {
            delegate,
            locale: None,
        }
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn set_locale(&mut self, locale: Option<Locale>) {
        self.locale = locale;
    }

    pub fn current_locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }
}

impl MessageInterpolator for LocaleDelegatingInterpolator {
    fn interpolate(&self, template: &str, context: &MessageContext<'_>) -> String {
        self.delegate
            .interpolate_for_locale(template, context, self.locale.as_ref())
    }

    fn interpolate_for_locale(
        &self,
        template: &str,
        context: &MessageContext<'_>,
        locale: Option<&Locale>,
    ) -> String {
        self.delegate.interpolate_for_locale(template, context, locale)
    }
}
