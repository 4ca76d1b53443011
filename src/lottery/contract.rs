//! Lottery contract ABI.
//!
//! Must match the deployed contract exactly; a mismatch surfaces as a
//! reverted call or a decode error.

use alloy::sol;

sol! {
    interface ILottery {
        function selectWinner() external;
        function getBalance() external view returns (uint256);
        function getContractBalance() external view returns (uint256);
        function getPlayersCount() external view returns (uint256);
        function getPlayers() external view returns (address[]);
        function manager() external view returns (address);
        function participants(uint256 index) external view returns (address);
        function random() external view returns (uint256);

        #[derive(Debug)]
        event WinnerSelected(address indexed winner, uint256 amount);

        #[derive(Debug)]
        event Entered(address indexed participant);
    }
}
