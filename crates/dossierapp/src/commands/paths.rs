use crate::commands::{CmdResult, DossierPaths};
use crate::error::Result;

/// Tables first, then image directories, then static images.
pub fn run(paths: &DossierPaths) -> Result<CmdResult> {
    Ok(CmdResult::default().with_paths(vec![
        paths.clients_file(),
        paths.projects_file(),
        paths.client_images_dir.clone(),
        paths.project_images_dir.clone(),
        paths.logo.clone(),
        paths.placeholder.clone(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn lists_tables_before_assets() {
        let paths = DossierPaths::under("/srv/taller");
        let result = run(&paths).unwrap();
        assert_eq!(result.paths[0], PathBuf::from("/srv/taller/data/clientes.csv"));
        assert_eq!(result.paths[1], PathBuf::from("/srv/taller/data/proyectos.csv"));
        assert_eq!(result.paths.len(), 6);
    }
}
