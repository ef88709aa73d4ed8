// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These are the collaborators the `FileStore` is assembled from.

// `provisioner` module:
// Ensures the parent directory of a target file exists, creating a single
// missing level when needed. The store runs it once at construction.
pub mod provisioner;

// `replacer` module:
// Defines the `LineRewriter` trait and the `Substitution` implementation that
// performs the literal, non-overlapping find-and-replace on each line during
// an update.
pub mod replacer;

// `reporter` module:
// Turns operation results into console output. It defines an
// `OperationReporter` trait and its `ConsoleReporter` implementation, plus the
// `FileStatus` snapshot shown by the `status` command.
pub mod reporter;

// `staging` module:
// Provides the `StagingProvider` abstraction for the temporary replacement
// file written by an update, and the default `SiblingStaging` that places it
// next to the target so it can be renamed into place atomically.
pub mod staging;

// `validator` module:
// Checks a configuration (or just a target path) for problems before the
// store is used: unsupported versions, directory targets, and parent paths
// that cannot be provisioned.
pub mod validator;
