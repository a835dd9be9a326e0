// We define separate Error types within the public and internal crate and
// just have the public crate wrap the internal crate. The internal crate
// (being no_std) currently reports problems with `&'static str`.

use std::path::PathBuf;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The underlying internal error type
#[non_exhaustive]
#[derive(Debug)]
enum ErrorKind {
    /// An error that occurs when a histogram has the wrong shape
    HistogramShape(HistogramShapeError),
    /// An error that occurs within `balance_nostd_internal`
    ///
    /// This wraps the stringly errors that are returned by the internal
    /// crate.
    InternalLegacyAdHoc(InternalLegacyAdHocError),
    /// An error that occurs when a required parameter isn't provided
    MissingParameter(MissingParameterError),
    /// An error that occurs when a parameter holds an unusable value
    InvalidParameter(InvalidParameterError),
    /// An error that occurs when writing an output table fails
    Output(OutputError),
    /// An error that occurs when the shared random generator was dropped
    /// before the analysis finished using it
    RandomSourceExpired(RandomSourceExpiredError),
}

// define constructor methods for Error
impl Error {
    /// produce an error indicating that a histogram has the wrong shape
    pub(crate) fn histogram_shape(n_rap_bins: usize, n_phi_bins: usize) -> Self {
        Error {
            kind: ErrorKind::HistogramShape(HistogramShapeError {
                n_rap_bins,
                n_phi_bins,
            }),
        }
    }

    /// wraps an internal error string
    pub(crate) fn internal_legacy_adhoc(message: &'static str) -> Self {
        Error {
            kind: ErrorKind::InternalLegacyAdHoc(InternalLegacyAdHocError(message)),
        }
    }

    /// produce an error indicating that a required parameter is missing
    pub(crate) fn missing_parameter(key: &'static str) -> Self {
        Error {
            kind: ErrorKind::MissingParameter(MissingParameterError { key }),
        }
    }

    /// produce an error indicating that a parameter holds an unusable value
    pub(crate) fn invalid_parameter(key: &'static str, value: f64, what: &'static str) -> Self {
        Error {
            kind: ErrorKind::InvalidParameter(InvalidParameterError { key, value, what }),
        }
    }

    /// produce an error indicating that an output table couldn't be written
    pub(crate) fn output(path: PathBuf, source: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Output(OutputError { path, source }),
        }
    }

    /// produce an error indicating that the random generator is gone
    pub(crate) fn random_source_expired() -> Self {
        Error {
            kind: ErrorKind::RandomSourceExpired(RandomSourceExpiredError),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind {
            ErrorKind::Output(ref err) => Some(&err.source),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.kind.fmt(f)
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            ErrorKind::HistogramShape(ref err) => err.fmt(f),
            ErrorKind::InternalLegacyAdHoc(ref msg) => msg.fmt(f),
            ErrorKind::MissingParameter(ref err) => err.fmt(f),
            ErrorKind::InvalidParameter(ref err) => err.fmt(f),
            ErrorKind::Output(ref err) => err.fmt(f),
            ErrorKind::RandomSourceExpired(ref err) => err.fmt(f),
        }
    }
}

/// An error that occurs when a histogram has the wrong shape
#[derive(Clone, Debug)]
struct HistogramShapeError {
    n_rap_bins: usize,
    n_phi_bins: usize,
}

impl core::fmt::Display for HistogramShapeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "histograms need at least 1 bin along each axis. Requested {} Δy \
             bins and {} Δφ bins",
            self.n_rap_bins, self.n_phi_bins
        )
    }
}

/// A temporary type that wraps the string errors from
/// `balance_nostd_internal`
#[derive(Clone)]
struct InternalLegacyAdHocError(&'static str);

impl core::fmt::Display for InternalLegacyAdHocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::fmt::Debug for InternalLegacyAdHocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.0, f)
    }
}

/// An error that occurs when a required parameter isn't provided
#[derive(Clone, Debug)]
struct MissingParameterError {
    key: &'static str,
}

impl core::fmt::Display for MissingParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "the \"{}\" parameter was not specified", self.key)
    }
}

/// An error that occurs when a parameter holds an unusable value
#[derive(Clone, Debug)]
struct InvalidParameterError {
    key: &'static str,
    value: f64,
    what: &'static str,
}

impl core::fmt::Display for InvalidParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let InvalidParameterError { key, value, what } = self;
        write!(f, "the \"{key}\" parameter has a value of {value}: {what}")
    }
}

/// An error that occurs when writing an output table fails
#[derive(Debug)]
struct OutputError {
    path: PathBuf,
    source: std::io::Error,
}

impl core::fmt::Display for OutputError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "problem writing {}: {}",
            self.path.display(),
            self.source
        )
    }
}

/// An error that occurs when the shared random generator was dropped
#[derive(Clone, Debug)]
struct RandomSourceExpiredError;

impl core::fmt::Display for RandomSourceExpiredError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "the shared random number generator was dropped before the \
             analysis finished"
        )
    }
}
