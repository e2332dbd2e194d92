pub(super) const ROOT_LONG_ABOUT: &str = "\
Baseline a tree of files and detect modified, deleted and new files

Sentinel records a SHA-256 fingerprint of the content of every file below a
directory, then later re-scans the directory and reports every file whose
content changed, that disappeared, or that appeared since the baseline.

MODES:

  init <DIRECTORY>
    Scan the directory and write the baseline file. An existing baseline is
    replaced without merging or backup.

  check <DIRECTORY>
    Load the baseline, re-scan the directory and print one line per deviation:

      [!] DELETED: <path>
      [!] MODIFIED: <path>
      [!] NEW FILE DETECTED: <path>

    Paths are relative to DIRECTORY and always use '/' as separator.

BASELINE FILE:

  A TOML file, by default sentinel_baseline.toml in the current working
  directory (see --baseline). It maps each path to its hex SHA-256 digest and
  is never itself included in a scan, even when it lives inside DIRECTORY.

WHAT IS TRACKED:

  Regular files, including symlinks that point at regular files. Only content
  matters: modification times, sizes and permissions are ignored. Directories
  are not tracked and directory symlinks are not followed. Files that cannot
  be read (for example due to permissions) are left out of the scan.

EXIT CODES:

  0: Baseline written, no deviations found, or usage shown
  1: Deviations found
  255: Any error (missing directory, missing or corrupt baseline, invalid mode)

EXAMPLES:

  $ sentinel init /etc
  $ sentinel check /etc || alert_admin

  # Keep the baseline somewhere else
  $ sentinel --baseline /var/lib/sentinel/etc.toml init /etc
";
