use std::fmt::{self, Display};

/// Sent to candidates scoring below the threshold.
#[derive(Debug)]
pub struct RejectionTemplate<'a> {
    pub name: &'a str,
    pub position: &'a str,
    pub weak_zone: &'a str,
}

impl<'a> Display for RejectionTemplate<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hello {name},

Thank you for your application for the {position} position in our company. \
Unfortunately, we cannot consider you for the further process. \
We found some areas that don't match with our requirements:

{weak_zone}

You can upgrade yourself and try later.

Best Regards,
HR Team",
            name = self.name,
            position = self.position,
            weak_zone = self.weak_zone,
        )
    }
}

/// Sent to candidates at or above the threshold.
#[derive(Debug)]
pub struct AdvanceTemplate<'a> {
    pub name: &'a str,
    pub position: &'a str,
}

impl<'a> Display for AdvanceTemplate<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hello {name},

Thank you for your application for the {position} position in our company. \
We are pleased to consider you for the further process.

Best Regards,
HR Team",
            name = self.name,
            position = self.position,
        )
    }
}
